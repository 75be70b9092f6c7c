pub mod auth;
pub mod edit;
pub mod export;
pub mod pages;
pub mod show;

pub use auth::{login, logout, whoami, LoginArgs};
pub use edit::{add, push, AddArgs, PushArgs};
pub use export::{export, ExportArgs};
pub use pages::{create, delete, list, rename, DeleteArgs, RenameArgs};
pub use show::{show, ShowArgs};
