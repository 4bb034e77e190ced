//! Demo account and sample proposals for local runs without a database.

use tracing::info;

use crate::auth::password::hash_password_blocking;
use crate::auth::store::UserStore;
use crate::errors::AppError;
use crate::generation::template::{
    generate_cover_letter_text, generate_proposal_text, ProposalRequest,
};
use crate::models::proposal::NewProposal;
use crate::models::user::NewUser;
use crate::proposals::store::ProposalStore;

pub const DEMO_EMAIL: &str = "demo@example.com";
pub const DEMO_PASSWORD: &str = "password123";
const DEMO_NAME: &str = "Demo User";

fn demo_requests() -> [(ProposalRequest, bool); 2] {
    [
        (
            ProposalRequest {
                job_title: "React Developer".to_string(),
                job_description:
                    "We are looking for an experienced React developer to join our team."
                        .to_string(),
                skills: "React, TypeScript, Next.js".to_string(),
                experience: "5 years of experience in frontend development".to_string(),
            },
            true,
        ),
        (
            ProposalRequest {
                job_title: "Content Writer".to_string(),
                job_description: "We need a content writer for our blog about technology and AI."
                    .to_string(),
                skills: "Content Writing, SEO, Technology".to_string(),
                experience: "3 years of experience writing tech articles".to_string(),
            },
            false,
        ),
    ]
}

/// Creates the demo user and two sample proposals. Skips if the user exists.
pub async fn seed_demo_data(
    users: &dyn UserStore,
    proposals: &dyn ProposalStore,
) -> Result<(), AppError> {
    if users.find_by_email(DEMO_EMAIL).await?.is_some() {
        return Ok(());
    }

    let user = users
        .create(NewUser {
            name: DEMO_NAME.to_string(),
            email: DEMO_EMAIL.to_string(),
            password_hash: hash_password_blocking(DEMO_PASSWORD.to_string()).await?,
        })
        .await?;

    for (request, is_favorite) in demo_requests() {
        let proposal = generate_proposal_text(&request);
        let cover_letter = generate_cover_letter_text(&request);
        proposals
            .insert(NewProposal {
                user_id: user.id,
                request,
                proposal,
                cover_letter,
                is_favorite,
            })
            .await?;
    }

    info!("Seeded demo account {DEMO_EMAIL}");
    Ok(())
}
