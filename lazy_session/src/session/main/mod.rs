mod accessor;
mod csrf;
mod flash;

#[cfg(test)]
mod test_utils;

pub use accessor::LazySession;
