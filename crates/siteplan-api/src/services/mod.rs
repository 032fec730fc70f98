mod session;

pub use session::SessionService;
