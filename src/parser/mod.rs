pub mod decode_error;
pub mod gp_parser;
pub mod gp_types;
pub mod primitive_parser;
pub mod ptb_parser;
pub mod ptb_types;

#[cfg(test)]
mod ptb_parser_tests;
