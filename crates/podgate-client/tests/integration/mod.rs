mod acp;
mod effective;
mod wac;
