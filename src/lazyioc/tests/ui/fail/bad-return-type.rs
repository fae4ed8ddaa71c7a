use lazyioc::component;

pub struct Test;

#[component]
impl Test {
    #[inject]
    pub fn new() -> i32 {
        0
    }
}

fn main() {
    let _ = Test;
}
