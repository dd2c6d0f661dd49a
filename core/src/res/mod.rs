pub mod test_pattern;
