use lazyioc::component;

pub struct Test;

#[component]
impl Test {
    #[inject]
    pub fn new() -> Self {
        Self
    }

    #[inject]
    pub fn create() -> Self {
        Self
    }
}

fn main() {
    let _ = Test;
}
