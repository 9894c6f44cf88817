pub mod handler;
#[cfg(test)]
mod tests;
