use lazyioc::component;

pub struct Test;

#[component]
impl Test {
    pub fn new() -> Self {
        Self
    }
}

fn main() {
    let _ = Test;
}
