pub mod alert;
pub mod pending_request;
pub mod section;
pub mod template_state;

pub use alert::{Alert, Severity};
pub use pending_request::PendingRequest;
pub use section::{Children, Props, Section, SectionNode};
pub use template_state::TemplateState;
