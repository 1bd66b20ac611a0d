//! WhatsApp contact links
//!
//! Clients are reached through WhatsApp. Contacts are stored as typed
//! (`(11) 98888-7777`), so links normalize them to digits and add the
//! Brazilian country code to bare 10 and 11 digit numbers.

use crate::models::OrderStatus;

const COUNTRY_CODE: &str = "55";

/// Build a `wa.me` link for `contact` with a prefilled message
///
/// Without a message the greeting references `order_number` when given.
pub fn whatsapp_link(contact: &str, message: Option<&str>, order_number: Option<&str>) -> String {
    let digits: String = contact.chars().filter(char::is_ascii_digit).collect();
    let number = if !digits.starts_with(COUNTRY_CODE) && matches!(digits.len(), 10 | 11) {
        format!("{}{}", COUNTRY_CODE, digits)
    } else {
        digits
    };

    let default_message = match order_number {
        Some(number) => format!("Olá, referente à OS #{}.", number),
        None => "Olá!".to_string(),
    };
    let text = match message {
        Some(message) if !message.is_empty() => message.to_string(),
        _ => default_message,
    };

    format!("https://wa.me/{}?text={}", number, urlencoding::encode(&text))
}

/// Message telling a client their order changed status
pub fn status_update_message(
    client_name: Option<&str>,
    order_number: &str,
    status: OrderStatus,
) -> String {
    format!(
        "Olá {}, a Ordem de Serviço #{} teve seu status atualizado para: *{}*.\n\nObrigado pela preferência!",
        client_name.unwrap_or("cliente"),
        order_number,
        status
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_country_code_to_local_numbers() {
        let link = whatsapp_link("(11) 98888-7777", None, None);
        assert!(link.starts_with("https://wa.me/5511988887777?text="));

        let landline = whatsapp_link("11 3333-4444", None, None);
        assert!(landline.starts_with("https://wa.me/551133334444?"));
    }

    #[test]
    fn test_keeps_numbers_with_country_code() {
        let link = whatsapp_link("+55 11 98888-7777", None, None);
        assert!(link.starts_with("https://wa.me/5511988887777?"));
    }

    #[test]
    fn test_default_messages_are_encoded() {
        let plain = whatsapp_link("11988887777", None, None);
        assert!(plain.ends_with("?text=Ol%C3%A1%21"));

        let with_order = whatsapp_link("11988887777", None, Some("OS-1001"));
        assert!(with_order.contains("OS%20%23OS-1001"));
    }

    #[test]
    fn test_status_message() {
        let message = status_update_message(Some("Ana"), "OS-1002", OrderStatus::Delivered);
        assert!(message.starts_with("Olá Ana, a Ordem de Serviço #OS-1002"));
        assert!(message.contains("*Delivered*"));

        let anonymous = status_update_message(None, "OS-1", OrderStatus::Received);
        assert!(anonymous.starts_with("Olá cliente,"));
    }
}
