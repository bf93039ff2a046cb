//! # Input Components
//!
//! Labelled form controls used by every Kithab form. Each control takes an
//! optional `error` rendered under it, which is how
//! [`kithab_core::FieldErrors`] reach the user. Enter-to-submit comes from
//! wrapping the controls in a `form`, not from the controls themselves.

use dioxus::prelude::*;

/// Label, control and field error stacked in one group
#[component]
fn Field(label: String, error: Option<String>, children: Element) -> Element {
    rsx! {
        div {
            class: "input-group",
            label { class: "input-label", "{label}" }
            {children}
            if let Some(error) = error {
                p { class: "field-error", "{error}" }
            }
        }
    }
}

/// Class list for a control
fn control_class(has_error: bool, disabled: bool) -> &'static str {
    match (has_error, disabled) {
        (false, false) => "input",
        (true, false) => "input input-error",
        (false, true) => "input input-disabled",
        (true, true) => "input input-error input-disabled",
    }
}

/// Single-line input; `input_type` is passed straight to the element
#[component]
pub fn TextInput(
    label: String,
    value: String,
    #[props(default = "text".to_string())] input_type: String,
    #[props(default)] placeholder: String,
    #[props(default)] error: Option<String>,
    #[props(default)] disabled: bool,
    on_change: EventHandler<String>,
) -> Element {
    let class = control_class(error.is_some(), disabled);
    rsx! {
        Field {
            label,
            error,
            input {
                class,
                r#type: "{input_type}",
                value: "{value}",
                placeholder: "{placeholder}",
                disabled,
                oninput: move |e| on_change.call(e.value()),
            }
        }
    }
}

/// One `<option>` of a [`Select`]
#[derive(Clone, PartialEq, Debug)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Dropdown; a `placeholder` becomes an empty-valued first entry so a
/// cascade level can be cleared again
#[component]
pub fn Select(
    label: String,
    value: String,
    options: Vec<SelectOption>,
    #[props(default)] placeholder: Option<String>,
    #[props(default)] error: Option<String>,
    #[props(default)] disabled: bool,
    on_change: EventHandler<String>,
) -> Element {
    let class = format!("{} select", control_class(error.is_some(), disabled));
    rsx! {
        Field {
            label,
            error,
            select {
                class,
                disabled,
                onchange: move |e| on_change.call(e.value()),
                if let Some(placeholder) = placeholder {
                    option { value: "", selected: value.is_empty(), "{placeholder}" }
                }
                for opt in options {
                    option {
                        key: "{opt.value}",
                        value: "{opt.value}",
                        selected: value == opt.value,
                        "{opt.label}"
                    }
                }
            }
        }
    }
}

/// Error line shown at the top of a form; renders nothing without a message
#[component]
pub fn Banner(message: Option<String>) -> Element {
    let Some(message) = message else {
        return rsx! {};
    };
    rsx! {
        div { class: "banner banner-error", "{message}" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_class() {
        assert_eq!(control_class(false, false), "input");
        assert_eq!(control_class(true, false), "input input-error");
        assert_eq!(control_class(true, true), "input input-error input-disabled");
    }
}
