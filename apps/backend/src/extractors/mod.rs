pub mod current_user;
pub mod pagination;
pub mod validated_json;

pub use current_user::{AdminUser, CurrentUser};
pub use pagination::PageParams;
pub use validated_json::ValidatedJson;
