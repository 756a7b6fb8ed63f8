mod buffer;
mod expr;
