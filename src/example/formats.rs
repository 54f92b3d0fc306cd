// Canonical example strings for well-known `format` values

/// Returns the example literal for a string `format`, if it is a known one.
pub fn format_example(format: &str) -> Option<&'static str> {
    let literal = match format {
        "date" => "2020-05-14",
        "time" => "23:44:51-07:00",
        "date-time" => "2020-05-14T23:44:51-07:00",
        "duration" => "P30S",
        "email" | "idn-email" => "user@example.com",
        "hostname" | "idn-hostname" => "example.com",
        "ipv4" => "192.0.2.1",
        "ipv6" => "2001:db8::1",
        "uuid" => "3e4666bf-d5e5-4aa7-b8ce-cefe41c7568a",
        "uri" | "iri" => "https://example.com/",
        "uri-reference" | "iri-reference" => "/example",
        "uri-template" => "https://example.com/{id}",
        "json-pointer" => "/example/0/id",
        "relative-json-pointer" => "0/id",
        "regex" => "ab+c",
        "password" => "********",
        _ => return None,
    };
    Some(literal)
}
