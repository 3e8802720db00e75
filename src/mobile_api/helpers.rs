use crate::enums::ConfirmationType;
use crate::error::ParseHtmlError;
use crate::response::MobileConfirmation;
use scraper::{Html, Selector, element_ref::ElementRef};

/// Parses confirmations out of the HTML confirmations page. Older clients
/// receive this page where newer ones receive JSON; only the ids and the
/// description survive the format.
pub fn parse_confirmations(text: &str) -> Result<Vec<MobileConfirmation>, ParseHtmlError> {
    fn parse_entry(
        element: ElementRef,
        description_selector: &Selector,
    ) -> Result<MobileConfirmation, ParseHtmlError> {
        let description = element.select(description_selector).next()
            .ok_or(ParseHtmlError::Malformed("Description is missing from confirmation"))?;
        let data_type = element.value().attr("data-type")
            .ok_or(ParseHtmlError::Malformed("Confirmation is missing data-type attribute"))?;
        let id = element.value().attr("data-confid")
            .ok_or(ParseHtmlError::Malformed("Confirmation is missing data-confid attribute"))?;
        let nonce = element.value().attr("data-key")
            .ok_or(ParseHtmlError::Malformed("Confirmation is missing data-key attribute"))?;
        let creator_id = element.value().attr("data-creator")
            .ok_or(ParseHtmlError::Malformed("Confirmation is missing data-creator attribute"))?;
        let summary = description
            .text()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_string())
            .collect::<Vec<_>>();
        let conf_type = ConfirmationType::from(data_type.parse::<u32>()?);

        Ok(MobileConfirmation {
            id: id.parse::<u64>()?,
            creator_id: creator_id.parse::<u64>()?,
            nonce: nonce.parse::<u64>()?,
            conf_type,
            summary,
            ..Default::default()
        })
    }

    let fragment = Html::parse_fragment(text);
    // these should probably never fail
    let mobileconf_empty_selector = Selector::parse("#mobileconf_empty")
        .map_err(|_e| ParseHtmlError::ParseSelector)?;
    let mobileconf_done_selector = Selector::parse(".mobileconf_done")
        .map_err(|_e| ParseHtmlError::ParseSelector)?;
    let div_selector = Selector::parse("div")
        .map_err(|_e| ParseHtmlError::ParseSelector)?;

    if let Some(element) = fragment.select(&mobileconf_empty_selector).next() {
        if mobileconf_done_selector.matches(&element) {
            if let Some(element) = element.select(&div_selector).nth(1) {
                let error_message = element
                    .text()
                    .collect::<String>();

                return Err(ParseHtmlError::Response(error_message));
            } else {
                return Ok(Vec::new());
            }
        } else {
            return Ok(Vec::new());
        }
    }

    let confirmation_list_selector = Selector::parse(".mobileconf_list_entry")
        .map_err(|_e| ParseHtmlError::ParseSelector)?;
    let description_selector = Selector::parse(".mobileconf_list_entry_description")
        .map_err(|_e| ParseHtmlError::ParseSelector)?;
    let confirmations = fragment.select(&confirmation_list_selector)
        .map(|element| parse_entry(element, &description_selector))
        .collect::<Result<Vec<MobileConfirmation>, ParseHtmlError>>()?;

    Ok(confirmations)
}
