use ferrum_core::prelude::*;
use ferrum_core::{
    traverse, CollectingVisitor, FhirString, PathVisitor, PrimitiveValue, Reference,
};
use ferrum_models::{
    AnyResource, Group, HumanName, Organization, Patient, PatientContact, PatientDeceased,
};

fn reference(literal: &str) -> Reference {
    Reference::builder()
        .reference(literal)
        .build()
        .expect("reference builds")
}

/// Records every hook call as a short event string.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
    descend: bool,
}

impl Recorder {
    fn descending() -> Self {
        Self {
            events: Vec::new(),
            descend: true,
        }
    }
}

impl Visitor for Recorder {
    fn pre_visit(&mut self, node: &dyn Visitable) -> bool {
        self.events.push(format!("pre {}", node.type_name()));
        true
    }

    fn visit_start(&mut self, name: &str, index: Option<usize>, _node: &dyn Visitable) {
        self.events.push(format!("start {} {:?}", name, index));
    }

    fn visit(&mut self, name: &str, _index: Option<usize>, _node: &dyn Visitable) -> bool {
        self.events.push(format!("visit {}", name));
        self.descend
    }

    fn visit_end(&mut self, name: &str, _index: Option<usize>, _node: &dyn Visitable) {
        self.events.push(format!("end {}", name));
    }

    fn post_visit(&mut self, node: &dyn Visitable) {
        self.events.push(format!("post {}", node.type_name()));
    }

    fn visit_list_start(&mut self, name: &str, len: usize) {
        self.events.push(format!("list {} {}", name, len));
    }

    fn visit_list_end(&mut self, name: &str, len: usize) {
        self.events.push(format!("list-end {} {}", name, len));
    }
}

fn patient_with_contained() -> Patient {
    let organization = Organization::builder()
        .id("org1")
        .name("Acme")
        .build()
        .expect("organization builds");
    let group = Group::builder()
        .type_("person")
        .actual(true)
        .build()
        .expect("group builds");
    Patient::builder()
        .id("p1")
        .contained([AnyResource::from(organization), AnyResource::from(group)])
        .active(true)
        .build()
        .expect("patient builds")
}

#[test]
fn test_paths_follow_declaration_order() {
    let patient = patient_with_contained();
    let mut visitor = PathVisitor::new();
    traverse(&patient, &mut visitor);

    assert_eq!(
        visitor.into_paths(),
        vec![
            "Patient",
            "Patient.id",
            "Patient.contained[0]",
            "Patient.contained[0].id",
            "Patient.contained[0].name",
            "Patient.contained[1]",
            "Patient.contained[1].type",
            "Patient.contained[1].actual",
            "Patient.active",
        ]
    );
}

#[test]
fn test_hook_sequence_for_heterogeneous_list() {
    let patient = patient_with_contained();
    let mut recorder = Recorder::descending();
    traverse(&patient, &mut recorder);

    let expected = [
        "pre Patient",
        "start Patient None",
        "visit Patient",
        "pre id",
        "start id None",
        "visit id",
        "end id",
        "post id",
        "list contained 2",
        "pre Organization",
        "start contained Some(0)",
        "visit contained",
        "pre id",
        "start id None",
        "visit id",
        "end id",
        "post id",
        "pre string",
        "start name None",
        "visit name",
        "end name",
        "post string",
        "end contained",
        "post Organization",
        "pre Group",
        "start contained Some(1)",
        "visit contained",
        "pre code",
        "start type None",
        "visit type",
        "end type",
        "post code",
        "pre boolean",
        "start actual None",
        "visit actual",
        "end actual",
        "post boolean",
        "end contained",
        "post Group",
        "list-end contained 2",
        "pre boolean",
        "start active None",
        "visit active",
        "end active",
        "post boolean",
        "end Patient",
        "post Patient",
    ];
    assert_eq!(recorder.events, expected);
}

#[test]
fn test_veto_at_root_still_closes_root() {
    let patient = patient_with_contained();
    let mut recorder = Recorder::default();
    traverse(&patient, &mut recorder);

    assert_eq!(
        recorder.events,
        vec![
            "pre Patient",
            "start Patient None",
            "visit Patient",
            "end Patient",
            "post Patient",
        ]
    );
}

#[test]
fn test_pre_visit_veto_skips_subtree() {
    struct SkipContained(Vec<String>);

    impl Visitor for SkipContained {
        fn pre_visit(&mut self, node: &dyn Visitable) -> bool {
            !node.is::<Organization>() && !node.is::<Group>()
        }

        fn visit_start(&mut self, name: &str, _index: Option<usize>, _node: &dyn Visitable) {
            self.0.push(name.to_string());
        }
    }

    let patient = patient_with_contained();
    let mut visitor = SkipContained(Vec::new());
    traverse(&patient, &mut visitor);
    assert_eq!(visitor.0, vec!["Patient", "id", "active"]);
}

#[test]
fn test_choice_visits_under_base_name() {
    let patient = Patient::builder()
        .deceased(ferrum_core::DateTime::new("2015-02-07").expect("valid dateTime"))
        .build()
        .expect("patient builds");
    assert!(matches!(patient.deceased(), Some(PatientDeceased::DateTime(_))));

    let mut visitor = PathVisitor::new();
    traverse(&patient, &mut visitor);
    assert_eq!(visitor.paths().to_vec(), vec!["Patient", "Patient.deceased"]);
}

#[test]
fn test_collecting_visitor_finds_nested_references() {
    let contact = PatientContact::builder()
        .organization(reference("Organization/contact"))
        .build()
        .expect("contact builds");
    let patient = Patient::builder()
        .contact([contact])
        .general_practitioner([reference("Practitioner/a"), reference("Practitioner/b")])
        .managing_organization(reference("Organization/managing"))
        .build()
        .expect("patient builds");

    let mut visitor = CollectingVisitor::<Reference>::new();
    traverse(&patient, &mut visitor);
    let literals: Vec<_> = visitor
        .result()
        .iter()
        .filter_map(|r| r.reference_str())
        .collect();
    assert_eq!(
        literals,
        vec![
            "Organization/contact",
            "Practitioner/a",
            "Practitioner/b",
            "Organization/managing",
        ]
    );
}

#[test]
fn test_ids_reach_the_visitor() {
    #[derive(Default)]
    struct Ids {
        logical: Vec<String>,
        attributes: Vec<String>,
        urls: Vec<String>,
    }

    impl Visitor for Ids {
        fn visit(&mut self, name: &str, _index: Option<usize>, node: &dyn Visitable) -> bool {
            if name == "id" {
                if let Some(PrimitiveValue::String(s)) = node.primitive_value() {
                    self.logical.push(s.to_string());
                }
            }
            if let Some(id) = node.element_id() {
                self.attributes.push(id.to_string());
            }
            if let Some(url) = node.extension_url() {
                self.urls.push(url.to_string());
            }
            true
        }
    }

    let flag = ferrum_core::Extension::builder()
        .id("ext-1")
        .url("http://example.org/fhir/StructureDefinition/flag")
        .value(true)
        .build()
        .expect("extension builds");
    let name = HumanName::builder()
        .id("name-1")
        .family("Chalmers")
        .extension([flag])
        .build()
        .expect("name builds");
    let organization = Organization::builder()
        .id("org1")
        .name("Acme")
        .build()
        .expect("organization builds");
    let patient = Patient::builder()
        .id("p1")
        .contained([organization])
        .name([name])
        .build()
        .expect("patient builds");
    assert_eq!(patient.id(), Some("p1"));

    let mut visitor = Ids::default();
    traverse(&patient, &mut visitor);
    assert_eq!(visitor.logical, vec!["p1", "org1"]);
    assert_eq!(visitor.attributes, vec!["name-1", "ext-1"]);
    assert_eq!(
        visitor.urls,
        vec!["http://example.org/fhir/StructureDefinition/flag"]
    );
}

#[test]
fn test_primitive_values_without_downcasting() {
    struct Strings(Vec<String>);

    impl Visitor for Strings {
        fn visit(&mut self, _name: &str, _index: Option<usize>, node: &dyn Visitable) -> bool {
            if let Some(PrimitiveValue::String(s)) = node.primitive_value() {
                self.0.push(s.to_string());
            }
            true
        }
    }

    let name = HumanName::builder()
        .family("Chalmers")
        .given(["Peter", "James"])
        .build()
        .expect("name builds");
    let patient = Patient::builder()
        .name([name])
        .gender("male")
        .build()
        .expect("patient builds");

    let mut visitor = Strings(Vec::new());
    traverse(&patient, &mut visitor);
    assert_eq!(visitor.0, vec!["Chalmers", "Peter", "James", "male"]);

    let mut collector = CollectingVisitor::<FhirString>::new();
    traverse(&patient, &mut collector);
    assert_eq!(collector.into_result().len(), 3);
}
