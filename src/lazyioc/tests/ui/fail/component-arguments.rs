use lazyioc::component;

pub struct Test;

#[component(singleton)]
impl Test {
    #[inject]
    pub fn new() -> Self {
        Self
    }
}

fn main() {
    let _ = Test;
}
