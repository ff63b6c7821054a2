use crate::models::contact::ContactForm;

#[derive(Debug, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid(String),
}

impl Validity {
    pub fn is_valid(&self) -> bool {
        match &self {
            Validity::Valid => true,
            Validity::Invalid(_) => false,
        }
    }
}

pub fn validate_email_address(email: &str) -> Validity {
    if email.chars().count() > 320 {
        return Validity::Invalid(String::from("Email address is too long."));
    }

    for c in email.chars() {
        if c == ' ' || !c.is_ascii() {
            return Validity::Invalid(String::from(
                "Email address cannot contain a space or non-ASCII character.",
            ));
        }
    }

    if email.contains("@.") {
        return Validity::Invalid(String::from(
            "Domain name in email address cannot begin with a period.",
        ));
    }

    let email = match email.split_once('@') {
        Some(s) => s,
        None => {
            return Validity::Invalid(String::from("Email address must contain an at symbol (@)."))
        }
    };

    if email.0.is_empty() || email.1.len() < 3 {
        return Validity::Invalid(String::from("Email username or domain name is too short."));
    }

    if email.1.contains('@') || !email.1.contains('.') {
        return Validity::Invalid(String::from(
            "Email address must have only one at symbol (@) and the domain must contain a period.",
        ));
    }

    if email.1.ends_with('.') {
        return Validity::Invalid(String::from("Email address cannot end with a period."));
    }

    Validity::Valid
}

/// Every problem with a submitted contact form, in field order. An empty list means
/// the form can be sent.
pub fn validate_contact_form(form: &ContactForm) -> Vec<String> {
    let mut problems = Vec::new();

    if form.name.trim().is_empty() {
        problems.push(String::from("Name is required"));
    }

    if form.email.trim().is_empty() {
        problems.push(String::from("Email is required"));
    } else if !validate_email_address(form.email.trim()).is_valid() {
        problems.push(String::from("Please enter a valid email address"));
    }

    if form.subject.trim().is_empty() {
        problems.push(String::from("Subject is required"));
    }

    if form.message.trim().is_empty() {
        problems.push(String::from("Message is required"));
    }

    problems
}
