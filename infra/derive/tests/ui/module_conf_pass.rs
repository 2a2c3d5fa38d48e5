use cradle_kernel::domain::registry::ModuleConf;

#[cradle_derive::module_conf]
pub struct DemoConf {
    pub enabled: bool,
    pub name: String,
}

fn main() {
    let mut conf: Box<dyn ModuleConf> = Box::new(DemoConf::default());
    conf.as_any_mut().downcast_mut::<DemoConf>().unwrap().enabled = true;

    let demo = conf.as_any().downcast_ref::<DemoConf>().unwrap();
    assert_eq!(demo.clone(), DemoConf { enabled: true, name: String::new() });
}
