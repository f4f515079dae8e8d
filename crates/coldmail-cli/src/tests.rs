use super::*;
use coldmail_core::{GenerationResult, ProfileSummary};

fn generated(headline: &str) -> Generated {
    Generated {
        result: GenerationResult {
            email: "Saw your Node.js work at Acme. Worth a chat?".to_string(),
        },
        profile: ProfileSummary {
            name: "Jane Doe".to_string(),
            headline: headline.to_string(),
            kind: ReferenceKind::Individual,
        },
    }
}

#[test]
fn parses_classify_command() {
    let cli = Cli::try_parse_from(["coldmail-cli", "classify", "/in/jane-doe"])
        .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Classify { ref reference } if reference == "/in/jane-doe"
    ));
}

#[test]
fn parses_generate_command() {
    let cli = Cli::try_parse_from([
        "coldmail-cli",
        "generate",
        "--reference",
        "/company/acme",
        "--product",
        "Payroll API",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Generate { ref reference, ref product, json: false }
            if reference == "/company/acme" && product == "Payroll API"
    ));
}

#[test]
fn generate_requires_product() {
    let result = Cli::try_parse_from(["coldmail-cli", "generate", "--reference", "/in/jane"]);
    assert!(result.is_err());
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["coldmail-cli"]).is_err());
}

#[test]
fn describe_valid_reference_shows_canonical_url() {
    let text = describe_reference(&classify("/company/acme"));
    assert!(text.contains("kind:       organization"));
    assert!(text.contains("identifier: acme"));
    assert!(text.contains("https://www.linkedin.com/company/acme/"));
}

#[test]
fn describe_invalid_reference_shows_accepted_shapes() {
    let text = describe_reference(&classify("jane doe"));
    assert_eq!(text, Reference::validation_message());
}

#[test]
fn render_generated_puts_recipient_above_email() {
    let text = render_generated(&generated("Backend Engineer at Acme"));
    assert!(text.starts_with("To: Jane Doe (individual)\n    Backend Engineer at Acme\n\n"));
    assert!(text.ends_with("Worth a chat?"));
}

#[test]
fn render_generated_skips_empty_headline() {
    let text = render_generated(&generated(""));
    assert!(text.starts_with("To: Jane Doe (individual)\n\nSaw"));
}

#[test]
fn generated_json_keeps_email_and_profile() {
    let value = generated_json(&generated("Backend Engineer at Acme"));
    assert_eq!(value["email"], "Saw your Node.js work at Acme. Worth a chat?");
    assert_eq!(value["profile"]["kind"], "individual");
}
