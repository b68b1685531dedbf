#![no_main]

use ferrous_autowire::{ArgumentResolver, Container, DiError, ParameterDescriptor};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Some((&split, rest)) = data.split_first() else {
        return;
    };
    let (bound, wanted) = rest.split_at((split as usize).min(rest.len()));

    let container = Container::new();
    for &b in bound {
        let _ = container.argument(format!("p{}", b % 32), b);
    }

    let params: Vec<ParameterDescriptor> = wanted
        .iter()
        .map(|b| ParameterDescriptor::untyped(format!("p{}", b % 32)))
        .collect();

    let resolver = ArgumentResolver::new(&container);
    let unresolved = resolver.unresolved(&params);
    match resolver.resolve(&params) {
        Ok(args) => {
            assert!(unresolved.is_empty());
            assert_eq!(args.len(), params.len());
        }
        Err(DiError::MissingEntity(key)) => assert_eq!(unresolved[0].key(), key),
        Err(other) => panic!("unexpected error: {}", other),
    }
});
