use crate::digest::link::normalize;

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub link: String,
}

pub fn run(opts: &NormalizeOptions) -> String {
    normalize(&opts.link)
}
