mod create;
mod link;
mod status;
mod unlink;

pub use create::cmd_create;
pub use link::cmd_link;
pub use status::cmd_status;
pub use unlink::cmd_unlink;
