use lazyioc::component;

pub struct Test;

#[component]
impl Test {
    #[inject]
    pub fn new(&self) -> Self {
        Self
    }
}

fn main() {
    let _ = Test;
}
