#[cfg(test)]
pub mod test {
    use crate::defaulted::{Defaulted, read_defaulted, write_defaulted};
    use crate::map::{SpecificationMap, keys_lowercase_nospace};
    use crate::reader::{Reader, default_reader};
    use crate::spec::{Specification, bind, bind_defaulted, bind_optional};
    use crate::validate::Validator;
    use crate::writer::{Writer, default_writer};

    // -- Flat record with sectioned keys ----------------------------------------

    /// The record behind most importer and exporter tests: three top-level
    /// parameters, two under a `blurgle` section, and one boolean that can
    /// be switched on by naming it as a section.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct TestInputs {
        pub foo: String,
        pub bar: String,
        pub baz: Vec<f64>,
        pub verbose: bool,
        pub blurgle_baz: bool,
        pub blurgle_quux: Vec<i32>,
    }

    pub fn inputs_specs() -> Vec<Specification<TestInputs>> {
        vec![
            Specification::new(
                "foo",
                bind(|r: &TestInputs| &r.foo, |r: &mut TestInputs| &mut r.foo),
                Validator::accept(),
            )
            .describe("free-form text"),
            Specification::new(
                "bar",
                bind(|r: &TestInputs| &r.bar, |r: &mut TestInputs| &mut r.bar),
                Validator::accept(),
            ),
            Specification::new(
                "baz",
                bind(|r: &TestInputs| &r.baz, |r: &mut TestInputs| &mut r.baz),
                Validator::accept(),
            )
            .describe("a list of readings"),
            Specification::new(
                "verbose",
                bind(
                    |r: &TestInputs| &r.verbose,
                    |r: &mut TestInputs| &mut r.verbose,
                ),
                Validator::accept(),
            ),
            Specification::new(
                "blurgle.baz",
                bind(
                    |r: &TestInputs| &r.blurgle_baz,
                    |r: &mut TestInputs| &mut r.blurgle_baz,
                ),
                Validator::accept(),
            ),
            Specification::new(
                "blurgle.quux",
                bind(
                    |r: &TestInputs| &r.blurgle_quux,
                    |r: &mut TestInputs| &mut r.blurgle_quux,
                ),
                Validator::accept(),
            )
            .describe("small counters"),
        ]
    }

    /// `inputs_specs` keyed case-insensitively, spaces ignored.
    pub fn inputs_map() -> SpecificationMap<TestInputs> {
        SpecificationMap::with_canonical_keys(inputs_specs(), keys_lowercase_nospace).unwrap()
    }

    // -- Nested record with optional and defaulted fields -----------------------

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct TestEngine {
        pub threads: u32,
        pub rate: f64,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub struct TestService {
        pub name: String,
        pub engine: TestEngine,
        pub timeout: Option<u32>,
        pub retries: Defaulted<u8>,
    }

    impl Default for TestService {
        fn default() -> Self {
            TestService {
                name: String::new(),
                engine: TestEngine::default(),
                timeout: None,
                retries: Defaulted::new(3),
            }
        }
    }

    fn engine_threads_spec() -> Specification<TestEngine> {
        Specification::new(
            "threads",
            bind(
                |e: &TestEngine| &e.threads,
                |e: &mut TestEngine| &mut e.threads,
            ),
            Validator::nonzero(),
        )
        .describe("worker thread count")
    }

    fn engine_rate_spec() -> Specification<TestEngine> {
        Specification::new(
            "rate",
            bind(|e: &TestEngine| &e.rate, |e: &mut TestEngine| &mut e.rate),
            Validator::greater_than(0.0),
        )
    }

    pub fn service_specs() -> Vec<Specification<TestService>> {
        vec![
            Specification::new(
                "name",
                bind(
                    |s: &TestService| &s.name,
                    |s: &mut TestService| &mut s.name,
                ),
                Validator::nonempty(),
            )
            .describe("service name"),
            Specification::delegate(
                "engine.threads",
                |s: &TestService| &s.engine,
                |s: &mut TestService| &mut s.engine,
                engine_threads_spec(),
            ),
            Specification::delegate(
                "engine.rate",
                |s: &TestService| &s.engine,
                |s: &mut TestService| &mut s.engine,
                engine_rate_spec(),
            ),
            Specification::new(
                "timeout",
                bind_optional(
                    |s: &TestService| &s.timeout,
                    |s: &mut TestService| &mut s.timeout,
                ),
                Validator::nonzero(),
            )
            .describe("request timeout in seconds"),
            Specification::new(
                "retries",
                bind_defaulted(
                    |s: &TestService| &s.retries,
                    |s: &mut TestService| &mut s.retries,
                ),
                Validator::at_least(1).defaulted(),
            ),
        ]
    }

    pub fn service_map() -> SpecificationMap<TestService> {
        SpecificationMap::with_canonical_keys(service_specs(), keys_lowercase_nospace).unwrap()
    }

    /// Default registry extended with the empty-text sentinel for
    /// `TestService::retries`.
    pub fn service_reader() -> Reader {
        default_reader()
            .clone()
            .with_recursive(read_defaulted::<u8>(""))
    }

    pub fn service_writer() -> Writer {
        default_writer()
            .clone()
            .with_recursive(write_defaulted::<u8>(""))
    }

    #[test]
    fn fixture_maps_build() {
        let inputs = inputs_map();
        assert_eq!(inputs.len(), 6);
        assert!(inputs.get("Blurgle. Quux").is_some());

        let service = service_map();
        assert!(service.get("engine.threads").is_some());
    }
}
