use lazyioc::component;

pub struct Test;

#[component]
impl Test {
    #[inject]
    pub async fn new() -> Self {
        Self
    }
}

fn main() {
    let _ = Test;
}
