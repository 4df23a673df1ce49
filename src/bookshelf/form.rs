//! Book form values and the coercion applied when the form is read.
//!
//! The form holds raw text the way the user typed it. [`FormValues::read`] turns it
//! into [`BookProps`]: names are proper-cased, the page count must parse as a
//! non-negative integer. A bad page count is an [`InvalidField`], which the view
//! reports back to the user instead of letting it reach the model.

use crate::error::ShelfError;
use crate::model::BookProps;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Title,
    Author,
    Pages,
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FormField::Title => "title",
            FormField::Author => "author",
            FormField::Pages => "page count",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidField {
    pub field: FormField,
    pub value: String,
    pub reason: &'static str,
}

impl fmt::Display for InvalidField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid {} \"{}\": {}", self.field, self.value, self.reason)
    }
}

impl From<InvalidField> for ShelfError {
    fn from(invalid: InvalidField) -> Self {
        ShelfError::UnparseableInput {
            field: invalid.field,
            value: invalid.value,
            reason: invalid.reason,
        }
    }
}

/// Raw contents of the four form controls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues {
    pub title: String,
    pub author: String,
    pub pages: String,
    pub completed: bool,
}

impl FormValues {
    pub fn from_props(props: &BookProps) -> Self {
        Self {
            title: props.title.clone(),
            author: props.author.clone(),
            pages: props.page_count.to_string(),
            completed: props.is_read,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Title => self.title = value,
            FormField::Author => self.author = value,
            FormField::Pages => self.pages = value,
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Author => &self.author,
            FormField::Pages => &self.pages,
        }
    }

    pub fn read(&self) -> Result<BookProps, InvalidField> {
        Ok(BookProps {
            title: proper_case(&self.title),
            author: proper_case(&self.author),
            page_count: parse_page_count(&self.pages)?,
            is_read: self.completed,
        })
    }
}

pub fn parse_page_count(input: &str) -> Result<u32, InvalidField> {
    let trimmed = input.trim();
    let invalid = |reason| InvalidField {
        field: FormField::Pages,
        value: input.to_string(),
        reason,
    };

    if trimmed.is_empty() {
        return Err(invalid("a number is required"));
    }
    if let Some(digits) = trimmed.strip_prefix('-') {
        if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("must not be negative"));
        }
    }
    if !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid("must be a whole number"));
    }
    trimmed.parse().map_err(|_| invalid("is too large"))
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_apostrophe(c: char) -> bool {
    c == '\'' || c == '\u{2019}'
}

/// Capitalizes the first letter of each word and lowercases the rest.
///
/// Letters right after an apostrophe continue the word: `o'neil` becomes `O'neil`,
/// `DON'T` becomes `Don't`.
pub fn proper_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev: Option<char> = None;

    for c in input.chars() {
        if is_word_char(c) {
            let continues_word = matches!(prev, Some(p) if is_word_char(p) || is_apostrophe(p));
            if continues_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
        } else {
            out.push(c);
        }
        prev = Some(c);
    }

    out
}
