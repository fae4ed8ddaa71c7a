use std::convert::Infallible;
use std::fmt::Error as FmtError;
use std::sync::Arc;

use lazyioc::prelude::*;

pub struct Test1;

#[component]
impl Test1 {
    #[inject]
    pub fn new() -> Self {
        Self
    }
}

pub struct Test2(Arc<Test1>);

#[component]
impl Test2 {
    #[inject]
    pub fn new(test1: Arc<Test1>) -> Test2 {
        Test2(test1)
    }
}

pub struct Test3;

#[component]
impl Test3 {
    #[inject]
    pub fn new() -> Result<Self, Infallible> {
        Ok(Self)
    }
}

pub struct Test4;

#[component]
impl Test4 {
    #[inject]
    pub fn new(_: Arc<Test1>, _: Arc<Test2>) -> Result<Test4, FmtError> {
        Ok(Test4)
    }
}

pub struct Test5;

#[component]
impl Test5 {
    #[inject]
    pub fn new() -> std::result::Result<Test5, Infallible> {
        Ok(Test5)
    }

    pub fn helper(&self) {}
}

fn main() {
    let mut module = Module::new();
    bind::<Test1>().set_on(&mut module);
    bind::<Test2>().set_on(&mut module);
    bind::<Test3>().set_on(&mut module);
    bind::<Test4>().set_on(&mut module);
    bind::<Test5>().set_on(&mut module);

    let container = Container::init(module);
    container.get::<Test4>().unwrap();
    container.get::<Test5>().unwrap().helper();
}
