mod following;
mod home;
mod login;
mod profile;
mod register;

pub use following::FollowingPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use profile::ProfilePage;
pub use register::RegisterPage;
