//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Each repository has its own error enum that converts into
//! [`hwf_shared::AppError`].

pub mod assignment;
pub mod client;
pub mod inventory;
pub mod request;
pub mod request_item;
pub mod request_team;
pub mod skill;
pub mod team;
pub mod volunteer;

pub use assignment::{
    AssignVolunteerInput, AssignmentChange, AssignmentError, AssignmentRepository,
    VolunteerAssignment,
};
pub use client::{ClientError, ClientFilter, ClientInput, ClientRepository};
pub use inventory::{InventoryError, InventoryFilter, InventoryInput, InventoryRepository};
pub use request::{RequestDetails, RequestError, RequestFilter, RequestRepository, SavedRequest};
pub use request_item::{RequestItemDetail, RequestItemRepository, SavedItems};
pub use request_team::RequestTeamRepository;
pub use skill::{SkillError, SkillInput, SkillRepository};
pub use team::{TeamDetails, TeamError, TeamInput, TeamRepository};
pub use volunteer::{
    VolunteerDetails, VolunteerError, VolunteerFilter, VolunteerInput, VolunteerRepository,
};

use hwf_shared::AppError;
use hwf_shared::types::{PageRequest, PageResponse};
use sea_orm::{ConnectionTrait, DbErr, EntityTrait, PaginatorTrait, Select};

/// Runs a paginated select and wraps the rows with page metadata.
pub(crate) async fn fetch_page<E, C>(
    select: Select<E>,
    conn: &C,
    page: &PageRequest,
) -> Result<PageResponse<E::Model>, DbErr>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let page = page.normalized();
    let paginator = select.paginate(conn, page.limit());
    let total = paginator.num_items().await?;
    let data = paginator.fetch_page(u64::from(page.page - 1)).await?;
    Ok(PageResponse::new(data, page.page, page.per_page, total))
}

/// Maps a domain error's HTTP status onto the matching `AppError` variant.
pub(crate) fn domain_error(status: u16, message: String) -> AppError {
    match status {
        400 => AppError::Validation(message),
        404 => AppError::NotFound(message),
        409 => AppError::Conflict(message),
        422 => AppError::BusinessRule(message),
        _ => AppError::Internal(message),
    }
}

