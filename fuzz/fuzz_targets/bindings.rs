#![no_main]

use ferrous_autowire::{Container, DiError, Entity};
use libfuzzer_sys::fuzz_target;

// Each chunk is one operation: opcode, identifier byte, alias byte, value byte.
fuzz_target!(|data: &[u8]| {
    let container = Container::new();

    for op in data.chunks_exact(4) {
        let id = format!("id.{}", op[1] % 16);
        let alias = format!("alias.{}", op[2] % 8);
        let value = op[3];

        match op[0] % 5 {
            0 => {
                let taken = container.has(&id);
                let result = container.set(id.as_str(), Entity::instance(value), None);
                assert_eq!(taken, result.is_err());
            }
            1 => {
                let _ = container.set(id.as_str(), Entity::factory(move |_| value), Some(alias.as_str()));
            }
            2 => {
                container.add_alias(alias.as_str(), id.as_str());
                assert_eq!(container.alias_target(&alias).as_deref(), Some(id.as_str()));
            }
            3 => match container.get(&alias) {
                Ok(found) => assert!(found.downcast::<u8>().is_ok()),
                Err(DiError::MissingEntity(_)) => {}
                Err(other) => panic!("unexpected error: {}", other),
            },
            _ => {
                if let Ok(first) = container.get(&id) {
                    let second = container.get(&id).unwrap();
                    assert!(first.ptr_eq(&second));
                }
            }
        }
    }
});
