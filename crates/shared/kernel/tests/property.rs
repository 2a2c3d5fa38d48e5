use cradle_kernel::prelude::*;
use cradle_kernel::domain::{Mapping, Number, Scalar};
use proptest::prelude::*;
use std::sync::Arc;

#[cradle_derive::module_conf]
pub struct PropConf {
    pub enabled: bool,
    pub name: String,
    pub workers: u16,
}

const KNOWN: [&str; 3] = ["enabled", "name", "workers"];

fn registry() -> Arc<Registry> {
    let module = Module::builder("prop")
        .conf::<PropConf>()
        .command(Command::new(
            "enabled",
            CommandType::MAIN,
            setter::flag::<PropConf>("enabled", |c| &mut c.enabled),
        ))
        .command(Command::new(
            "name",
            CommandType::MAIN,
            setter::string::<PropConf>("name", |c| &mut c.name),
        ))
        .command(Command::new(
            "workers",
            CommandType::MAIN,
            setter::number::<PropConf, u16>("workers", |c| &mut c.workers),
        ))
        .build();
    Registry::builder().with(module).unwrap().seal()
}

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Scalar(Scalar::Null)),
        any::<bool>().prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::from),
        any::<i64>().prop_map(|n| Value::Scalar(Scalar::Number(Number::Integer(n)))),
        (-1.0e6_f64..1.0e6).prop_map(Value::from),
    ]
}

fn known_document() -> impl Strategy<Value = Value> {
    proptest::collection::btree_map(proptest::sample::select(KNOWN.to_vec()), scalar(), 0..=3)
        .prop_map(|map| Value::Mapping(map.into_iter().map(|(k, v)| (k.to_owned(), v)).collect()))
}

fn run(root: &Value) -> (Cycle, Result<usize, KernelError>) {
    let mut cycle = Cycle::new(registry());
    let result = dispatch(&mut cycle, root);
    (cycle, result)
}

proptest! {
    #[test]
    fn dispatch_is_deterministic(root in known_document()) {
        let (first, a) = run(&root);
        let (second, b) = run(&root);

        prop_assert_eq!(a.is_ok(), b.is_ok());
        if let (Err(a), Err(b)) = (&a, &b) {
            prop_assert_eq!(a.to_string(), b.to_string());
        }
        prop_assert_eq!(first.conf_of::<PropConf>("prop"), second.conf_of::<PropConf>("prop"));
    }

    #[test]
    fn setters_run_at_most_once_per_directive(root in known_document()) {
        let directives = root.as_mapping().map_or(0, Mapping::len);
        if let (_, Ok(applied)) = run(&root) {
            prop_assert!(applied <= directives);
        }
    }

    #[test]
    fn undeclared_names_are_rejected(name in "[a-z_]{1,12}", value in scalar()) {
        prop_assume!(!KNOWN.contains(&name.as_str()));
        let root: Value = [(name.clone(), value)].into_iter().collect();

        let (cycle, result) = run(&root);
        let err = result.unwrap_err();
        let is_unknown = matches!(err, KernelError::UnknownDirective { .. });
        prop_assert!(is_unknown);
        prop_assert_eq!(err.directive(), Some(name.as_str()));
        prop_assert_eq!(cycle.conf_of::<PropConf>("prop"), Some(&PropConf::default()));
    }

    #[test]
    fn flag_accepts_only_booleans(value in scalar()) {
        let root: Value = [("enabled", value.clone())].into_iter().collect();
        let (_, result) = run(&root);

        if value.as_bool().is_some() {
            prop_assert_eq!(result.ok(), Some(1));
        } else {
            let is_mismatch = matches!(result, Err(KernelError::TypeMismatch { .. }));
            prop_assert!(is_mismatch);
        }
    }

    #[test]
    fn workers_respect_the_field_range(n in any::<i64>()) {
        let root: Value = [("workers", n)].into_iter().collect();
        let (cycle, result) = run(&root);

        match u16::try_from(n) {
            Ok(expected) => {
                prop_assert!(result.is_ok());
                prop_assert_eq!(cycle.conf_of::<PropConf>("prop").map(|c| c.workers), Some(expected));
            },
            Err(_) => {
                let is_invalid = matches!(result, Err(KernelError::InvalidValue { .. }));
                prop_assert!(is_invalid);
            },
        }
    }
}
