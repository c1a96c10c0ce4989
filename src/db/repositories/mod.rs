mod question_repository;
mod session_repository;
mod trainee_repository;
mod video_repository;

pub use question_repository::QuestionRepository;
pub use session_repository::SessionRepository;
pub use trainee_repository::TraineeRepository;
pub use video_repository::VideoRepository;
