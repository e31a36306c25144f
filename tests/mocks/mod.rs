mod mock_browser;
mod mock_desktop;

#[allow(unused_imports)]
pub use mock_browser::MockBrowser;
#[allow(unused_imports)]
pub use mock_desktop::MockDesktop;
