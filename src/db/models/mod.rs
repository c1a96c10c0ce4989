mod question;
mod trainee;
mod training_session;
mod video;

pub use question::*;
pub use trainee::*;
pub use training_session::*;
pub use video::*;
