pub mod courses;
pub mod goals;
pub mod lessons;
pub mod quizzes;
