//! Form submission encoding through the public API.

use facet_testhelpers::test;
use htmlgen::form::{BoundaryGenerator, EncryptionType, collect_fields, encode_with};
use htmlgen::{Element, Form, FormError, FormMethod, Node, encode, tags};

fn text_input(name: &str, value: &str) -> Element {
    tags::input()
        .attr("name", name)
        .unwrap()
        .attr("value", value)
        .unwrap()
}

/// Hands out a fixed list of boundaries, then repeats the last one.
struct Fixed {
    queue: Vec<&'static str>,
    calls: usize,
}

impl Fixed {
    fn new(queue: Vec<&'static str>) -> Self {
        Self { queue, calls: 0 }
    }
}

impl BoundaryGenerator for Fixed {
    fn generate(&mut self) -> String {
        let idx = self.calls.min(self.queue.len() - 1);
        self.calls += 1;
        self.queue[idx].to_string()
    }
}

#[test]
fn form_defaults_to_get_and_url_encoding() {
    let form = Form::with_content([text_input("a", "1")]).unwrap();
    assert_eq!(form.get_method(), FormMethod::Get);
    assert!(!form.is_multipart());

    let submission = form.encode().unwrap();
    assert_eq!(submission.method, FormMethod::Get);
    assert_eq!(
        submission.content_type,
        "application/x-www-form-urlencoded"
    );
    assert_eq!(submission.body, b"a=1");
}

#[test]
fn multipart_two_fields_in_order() {
    let form = Form::with_content([text_input("a", "1"), text_input("b", "2")])
        .unwrap()
        .multipart(true);
    assert_eq!(form.get_encryption_type(), EncryptionType::Multipart);

    let submission = form.encode().unwrap();
    let boundary = submission
        .content_type
        .strip_prefix("multipart/form-data; boundary=")
        .expect("multipart content type carries a boundary")
        .to_string();
    assert!(boundary.starts_with("htmlgen-"));

    let body = submission.body_str().unwrap();
    let parts: Vec<&str> = body.split(&format!("--{boundary}")).collect();
    // Leading empty piece, two parts, closing `--\r\n`.
    assert_eq!(parts.len(), 4);
    assert_eq!(parts[0], "");
    assert_eq!(
        parts[1],
        "\r\nContent-Disposition: form-data; name=\"a\"\r\n\r\n1\r\n"
    );
    assert_eq!(
        parts[2],
        "\r\nContent-Disposition: form-data; name=\"b\"\r\n\r\n2\r\n"
    );
    assert_eq!(parts[3], "--\r\n");
}

#[test]
fn enctype_attribute_wins_over_method() {
    let form = tags::form()
        .attr("method", "post")
        .unwrap()
        .attr("enctype", "multipart/form-data")
        .unwrap();
    let mut fixed = Fixed::new(vec!["B"]);
    let submission = encode_with(&form, &mut fixed).unwrap();
    assert_eq!(submission.method, FormMethod::Post);
    assert_eq!(submission.content_type, "multipart/form-data; boundary=B");
    assert_eq!(submission.body_str(), Some("--B--\r\n"));

    let unknown = tags::form().attr("enctype", "text/plain").unwrap();
    assert_eq!(
        encode(&unknown).unwrap().content_type,
        "application/x-www-form-urlencoded"
    );
}

#[test]
fn url_encoding_uses_percent_twenty_for_spaces() {
    let form = Form::with_content([text_input("full name", "Ada Lovelace")]).unwrap();
    let submission = form.encode().unwrap();
    assert_eq!(submission.body_str(), Some("full%20name=Ada%20Lovelace"));
}

#[test]
fn get_submission_url_carries_query() {
    let form = Form::with_content([text_input("q", "a&b")])
        .unwrap()
        .action("/find");
    let submission = form.encode().unwrap();
    assert_eq!(submission.action, "/find");
    assert_eq!(submission.url(), "/find?q=a%26b");
}

#[test]
fn fields_collected_in_document_order() {
    let mut fieldset = tags::fieldset();
    fieldset.append(text_input("second", "2")).unwrap();
    let mut textarea = tags::textarea().attr("name", "third").unwrap();
    textarea.append(Node::text("3")).unwrap();

    let mut form = Form::new();
    form.append(text_input("first", "1")).unwrap();
    form.append(fieldset).unwrap();
    form.append(textarea).unwrap();
    form.append("<input name=\"raw\" value=\"ignored\">").unwrap();

    let names: Vec<String> = collect_fields(form.element())
        .unwrap()
        .into_iter()
        .map(|f| f.name.to_string())
        .collect();
    assert_eq!(names, ["first", "second", "third"]);
}

#[test]
fn disabled_fields_and_options_are_excluded() {
    let disabled = text_input("gone", "x").attr("disabled", true).unwrap();

    let mut group = tags::optgroup().attr("disabled", true).unwrap();
    group
        .append(
            tags::option()
                .attr("value", "locked")
                .unwrap()
                .attr("selected", true)
                .unwrap(),
        )
        .unwrap();
    let mut select = tags::select()
        .attr("name", "pick")
        .unwrap()
        .attr("multiple", true)
        .unwrap();
    select.append(group).unwrap();
    select
        .append(
            tags::option()
                .attr("value", "open")
                .unwrap()
                .attr("selected", true)
                .unwrap(),
        )
        .unwrap();

    let form = Form::with_content([disabled, select]).unwrap();
    assert_eq!(form.encode().unwrap().body_str(), Some("pick=open"));
}

#[test]
fn missing_required_values_fail() {
    let required = |elem: Element| {
        elem.attr("name", "need")
            .unwrap()
            .attr("required", true)
            .unwrap()
    };

    for field in [tags::input(), tags::textarea(), tags::select()] {
        let form = Form::with_content([required(field)]).unwrap();
        match form.encode() {
            Err(FormError::MissingFieldValue { name }) => assert_eq!(name, "need"),
            other => panic!("expected MissingFieldValue, got {other:?}"),
        }
    }

    // A value, even an empty one, satisfies `required`.
    let form = Form::with_content([required(tags::input()).attr("value", "").unwrap()]).unwrap();
    assert_eq!(form.encode().unwrap().body_str(), Some("need="));
}

#[test]
fn boundary_never_appears_in_content() {
    let form = Form::with_content([
        text_input("first", "has COLLIDE in it"),
        text_input("COLLIDE-TOO", "x"),
    ])
    .unwrap()
    .multipart(true);

    let mut fixed = Fixed::new(vec!["COLLIDE", "COLLIDE-TOO", "safe"]);
    let submission = encode_with(form.element(), &mut fixed).unwrap();

    assert_eq!(fixed.calls, 3);
    assert_eq!(submission.content_type, "multipart/form-data; boundary=safe");
    assert!(submission.body_str().unwrap().starts_with("--safe\r\n"));
}

#[test]
fn submission_is_repeatable() {
    let form = Form::with_content([text_input("k", "v")]).unwrap();
    let before = form.clone();
    assert_eq!(form.encode().unwrap(), form.encode().unwrap());
    assert_eq!(form, before);
}
