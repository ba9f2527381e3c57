pub mod authenticated_user;
pub mod claim;
pub mod guard;
pub mod password;
