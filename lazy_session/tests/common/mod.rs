
pub use mock_browser::MockBrowser;
