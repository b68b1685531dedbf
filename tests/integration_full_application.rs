/// Full application integration tests
///
/// These tests wire a small application through the container end to end:
/// configuration arguments, trait-bound infrastructure, autowired services
/// and controller methods invoked with their parameters filled in.

use ferrous_autowire::{
    Container, ContainerObserver, DiError, DiResult, Entity, FunctionDescriptor, Injectable,
    MetricsObserver, ParameterDescriptor, Resolver, Target, TypeDescriptor, Value,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ===== Logging Infrastructure =====

pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
    fn lines(&self) -> Vec<String>;
}

#[derive(Default)]
pub struct InMemoryLogger {
    lines: Mutex<Vec<String>>,
}

impl Logger for InMemoryLogger {
    fn log(&self, message: &str) {
        self.lines.lock().unwrap().push(message.to_string());
    }

    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

// ===== Data Access =====

pub struct Database {
    url: String,
    users: Mutex<Vec<String>>,
}

pub struct UserRepository {
    db: Arc<Database>,
    logger: Arc<dyn Logger>,
}

impl UserRepository {
    fn insert(&self, name: &str) -> usize {
        self.logger.log(&format!("insert {} into {}", name, self.db.url));
        let mut users = self.db.users.lock().unwrap();
        users.push(name.to_string());
        users.len()
    }
}

impl Injectable for UserRepository {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<UserRepository>()
            .constructor(
                vec![
                    ParameterDescriptor::typed::<Database>("db"),
                    ParameterDescriptor::trait_object::<dyn Logger>("logger"),
                ],
                |mut args| {
                    Ok(UserRepository {
                        db: args.take::<Database>()?,
                        logger: args.take_trait::<dyn Logger>()?,
                    })
                },
            )
            .build()
    }
}

// ===== Web Layer =====

pub struct UserController {
    repository: Arc<UserRepository>,
}

impl Injectable for UserController {
    fn descriptor() -> TypeDescriptor {
        TypeDescriptor::builder::<UserController>()
            .constructor(
                vec![ParameterDescriptor::typed::<UserRepository>("repository")],
                |mut args| {
                    Ok(UserController {
                        repository: args.take::<UserRepository>()?,
                    })
                },
            )
            .method(
                "create",
                vec![ParameterDescriptor::untyped("request.name")],
                |this: &UserController, mut args| {
                    let name = args.take::<String>()?;
                    Ok(this.repository.insert(&name))
                },
            )
            .static_method("route", vec![ParameterDescriptor::untyped("api.prefix")], |mut args| {
                Ok(format!("{}/users", args.take::<String>()?))
            })
            .build()
    }
}

fn bootstrap() -> DiResult<Container> {
    let container = Container::with_alias("container");
    container.register::<UserRepository>().register::<UserController>();
    container
        .argument("database.url", "postgres://localhost/app".to_string())?
        .argument("api.prefix", "/api/v1".to_string())?
        .set_trait::<dyn Logger>(Arc::new(InMemoryLogger::default()), Some("logger"))?
        .set_type::<Database>(
            Entity::try_factory(|c: &Container| {
                Ok(Database {
                    url: c.get_as::<String>("database.url")?.to_string(),
                    users: Mutex::new(Vec::new()),
                })
            }),
            Some("db"),
        )?;

    // The repository is shared: build it once through the container itself
    container.set_type::<UserRepository>(
        Entity::Factory(Box::new(|c: &Container| c.make(Target::of::<UserRepository>()))),
        None,
    )?;
    Ok(container)
}

#[test]
fn test_application_wiring() {
    let container = application();

    assert!(container.has("db"));
    assert!(container.has("logger"));
    assert_eq!(container.alias_target("db").as_deref(), Some(std::any::type_name::<Database>()));
    assert_eq!(container.get_type::<Database>().unwrap().url, "postgres://localhost/app");

    // Controllers are registered for construction but never bound
    assert!(container.is_registered(std::any::type_name::<UserController>()));
    assert!(!container.has(std::any::type_name::<UserController>()));
}

#[test]
fn test_request_flow() {
    let container = application();

    let controller = container.make_type::<UserController>().unwrap();
    let receiver = Value::from_arc(controller.clone());

    container.argument("request.name", "ada".to_string()).unwrap();
    let count = container.call(&receiver, "create").unwrap();
    assert_eq!(*count.downcast::<usize>().unwrap(), 1);

    let logger = container.get_trait::<dyn Logger>().unwrap();
    assert_eq!(logger.lines(), vec!["insert ada into postgres://localhost/app".to_string()]);

    // The controller shares the bound repository and database
    let repository = container.get_type::<UserRepository>().unwrap();
    assert!(Arc::ptr_eq(&controller.repository, &repository));
    assert_eq!(container.get_type::<Database>().unwrap().users.lock().unwrap().len(), 1);
}

#[test]
fn test_static_route_and_function() {
    let container = application();
    container.register_function(FunctionDescriptor::new(
        "health",
        vec![ParameterDescriptor::untyped("api.prefix"), ParameterDescriptor::untyped("container")],
        |mut args| {
            let prefix = args.take::<String>()?;
            let container = args.take::<Container>()?;
            Ok(format!("{}/health ({} bindings)", prefix, container.len()))
        },
    ));

    let route = container.call(Target::of::<UserController>(), "route").unwrap();
    assert_eq!(*route.downcast::<String>().unwrap(), "/api/v1/users");

    let health = container.call_function("health").unwrap();
    assert!(health.downcast::<String>().unwrap().starts_with("/api/v1/health"));
}

#[test]
fn test_validation_of_wired_application() {
    let container = application();

    let report = container.validate();
    // Only the per-request argument is unbound before a request arrives
    assert_eq!(report.errors.len(), 1);
    assert!(report.format_issues().contains("request.name"));

    container.argument("request.name", "grace".to_string()).unwrap();
    assert!(container.validate().is_valid());
}

#[test]
fn test_observer_sees_construction_and_failures() {
    let container = application();
    let metrics = Arc::new(MetricsObserver::new());
    container.add_observer(metrics.clone());

    container.make_type::<UserController>().unwrap();
    let controller = container.make(Target::of::<UserController>()).unwrap();
    let err = container.call(&controller, "create").unwrap_err();
    assert_eq!(err, DiError::MissingEntity("request.name".to_string()));

    assert_eq!(metrics.resolution_count(), 2);
    assert_eq!(metrics.failure_count(), 1);
}

#[test]
fn test_custom_observer_records_order() {
    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl ContainerObserver for Recorder {
        fn binding(&self, id: &str) {
            self.events.lock().unwrap().push(format!("binding {}", id));
        }
        fn bound(&self, id: &str, _duration: Duration) {
            self.events.lock().unwrap().push(format!("bound {}", id));
        }
        fn resolving(&self, _target: &str, member: &str) {
            self.events.lock().unwrap().push(format!("resolving {}", member));
        }
        fn resolved(&self, _target: &str, member: &str, _duration: Duration) {
            self.events.lock().unwrap().push(format!("resolved {}", member));
        }
        fn failed(&self, target: &str, _member: Option<&str>, _error: &DiError) {
            self.events.lock().unwrap().push(format!("failed {}", target));
        }
    }

    let container = Container::new();
    let recorder = Arc::new(Recorder::default());
    container.add_observer(recorder.clone());

    container.set("a", Entity::instance(1u8), None).unwrap();
    let _ = container.set("a", Entity::instance(2u8), None);
    container.argument("b", 1u8).unwrap();
    let _ = container.argument("b", 2u8);

    assert_eq!(
        *recorder.events.lock().unwrap(),
        vec![
            "binding a", "bound a", "binding a", "failed a",
            "binding b", "bound b", "binding b", "failed b",
        ]
    );
}

fn application() -> Container {
    bootstrap().unwrap()
}
