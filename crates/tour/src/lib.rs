pub mod autoplay;
pub mod media;
pub mod navigation;
pub mod ports;
pub mod presenter;
pub mod ui_mode;
pub mod url_state;

#[cfg(test)]
mod test_support;

pub use autoplay::*;
pub use media::*;
pub use navigation::*;
pub use ports::*;
pub use presenter::*;
pub use ui_mode::*;
pub use url_state::*;
