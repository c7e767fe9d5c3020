//! Statement rendering
//!
//! A resolved fragment becomes either a framework lookup wrapped in a
//! declaration for the target language, or a bare `name = '...'` line.

use crate::locator::strategy::SelectorFragment;
use crate::types::{Framework, Language, OutputMode};

/// Render one statement.
///
/// Cypress only has a JavaScript binding and Playwright has none for C++.
/// Those pairs render the language's Selenium declaration instead.
pub fn render(
    name: &str,
    fragment: &SelectorFragment,
    language: Language,
    framework: Framework,
    mode: OutputMode,
) -> String {
    if mode == OutputMode::String {
        return format!("{} = '{}'", name, escape_single(&fragment.to_string()));
    }

    let lookup = match framework {
        Framework::Cypress => cypress_lookup(fragment, language),
        Framework::Playwright => playwright_lookup(fragment, language),
        Framework::Selenium => None,
    };

    match lookup {
        Some(lookup) => declare(name, &lookup, language, framework),
        None => declare(
            name,
            &selenium_lookup(fragment, language),
            language,
            Framework::Selenium,
        ),
    }
}

/// Escape for a `'...'` literal: backslashes, then single quotes.
pub fn escape_single(s: &str) -> String {
    s.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Escape for a `"..."` literal: backslashes, then double quotes.
pub fn escape_double(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// XPath string literal for `text`. XPath has no escapes, so text holding
/// both quote kinds is spliced together with `concat()`.
pub fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{}'", text);
    }
    if !text.contains('"') {
        return format!("\"{}\"", text);
    }

    let parts: Vec<String> = text.split('\'').map(|part| format!("'{}'", part)).collect();
    format!("concat({})", parts.join(", \"'\", "))
}

// normalize-space(.) collapses runs, so the literal must too.
fn contains_xpath(tag: &str, text: &str) -> String {
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    format!("//{}[contains(normalize-space(.), {})]", tag, xpath_literal(&text))
}

// JavaScript bindings quote with '...', every other binding with "...".
fn quote(language: Language, s: &str) -> String {
    match language {
        Language::Js => format!("'{}'", escape_single(s)),
        _ => format!("\"{}\"", escape_double(s)),
    }
}

fn cypress_lookup(fragment: &SelectorFragment, language: Language) -> Option<String> {
    if language != Language::Js {
        return None;
    }

    Some(match fragment {
        SelectorFragment::Css(css) => format!("cy.get({})", quote(language, css)),
        SelectorFragment::XPath(path) => format!("cy.xpath({})", quote(language, path)),
        SelectorFragment::ContainsText { text, .. } => {
            format!("cy.contains(\"{}\")", escape_double(text))
        }
    })
}

fn selenium_lookup(fragment: &SelectorFragment, language: Language) -> String {
    let (by_css, by_xpath) = match language {
        Language::Js => ("driver.findElement(By.css", "driver.findElement(By.xpath"),
        Language::Python => (
            "self.driver.find_element_by_css_selector",
            "self.driver.find_element_by_xpath",
        ),
        Language::Java => ("driver.findElement(By.cssSelector", "driver.findElement(By.xpath"),
        Language::Csharp => ("Driver.FindElement(By.CssSelector", "Driver.FindElement(By.XPath"),
        Language::Cpp => ("driver->FindElement(By::cssSelector", "driver->FindElement(By::xpath"),
    };
    // Python's helpers take the string directly; the others nest a By call.
    let close = if language == Language::Python { ")" } else { "))" };

    match fragment {
        SelectorFragment::Css(css) => format!("{}({}{}", by_css, quote(language, css), close),
        SelectorFragment::XPath(path) => format!("{}({}{}", by_xpath, quote(language, path), close),
        SelectorFragment::ContainsText { tag, text } => format!(
            "{}({}{}",
            by_xpath,
            quote(language, &contains_xpath(tag, text)),
            close
        ),
    }
}

fn playwright_lookup(fragment: &SelectorFragment, language: Language) -> Option<String> {
    let page = match language {
        Language::Js | Language::Python | Language::Java => "page.locator",
        Language::Csharp => "Page.Locator",
        Language::Cpp => return None,
    };

    Some(match fragment {
        SelectorFragment::Css(css) => format!("{}({})", page, quote(language, css)),
        SelectorFragment::XPath(path) => {
            format!("{}({})", page, quote(language, &format!("xpath={}", path)))
        }
        SelectorFragment::ContainsText { tag, text } => {
            let tag = quote(language, tag);
            let text = quote(language, text);
            match language {
                Language::Js => format!("{}({}, {{ hasText: {} }})", page, tag, text),
                Language::Python => format!("{}({}, has_text={})", page, tag, text),
                Language::Java => format!(
                    "{}({}, new Page.LocatorOptions().setHasText({}))",
                    page, tag, text
                ),
                Language::Csharp => format!("{}({}, new() {{ HasText = {} }})", page, tag, text),
                Language::Cpp => return None,
            }
        }
    })
}

fn declare(name: &str, lookup: &str, language: Language, framework: Framework) -> String {
    match language {
        Language::Js => format!("const {} = {};", name, lookup),
        Language::Python => format!("{} = {}", name, lookup),
        Language::Java => {
            let handle = if framework == Framework::Playwright { "Locator" } else { "WebElement" };
            format!("{} {} = {};", handle, name, lookup)
        }
        Language::Csharp => {
            let handle = if framework == Framework::Playwright { "ILocator" } else { "IWebElement" };
            format!("{} {} = {};", handle, name, lookup)
        }
        Language::Cpp => format!("WebElement {} = {};", name, lookup),
    }
}
