//! Hover popup bodies.

use super::format::format_receipt_date;
use crate::detail::DetailPayload;

const DEFAULT_HOUSE_TYPE: &str = "APT";
const NO_ADDRESS_LABEL: &str = "주소 정보 없음";
const UNAVAILABLE_MESSAGE: &str = "상세 정보를 불러올 수 없습니다";

/// Content of a hover preview.
#[derive(Debug, Clone, PartialEq)]
pub enum PopupBody {
    Detail {
        title: String,
        address: String,
        house_type: String,
        receipt_start: String,
        attributes: Vec<(String, String)>,
    },
    /// Shown when the detail fetch failed.
    Unavailable { title: String, message: String },
}

impl PopupBody {
    pub fn title(&self) -> &str {
        match self {
            PopupBody::Detail { title, .. } | PopupBody::Unavailable { title, .. } => title,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, PopupBody::Unavailable { .. })
    }
}

/// Builds the popup body for a marker titled `marker_title`.
///
/// The payload's own name wins over the marker title when present.
pub fn popup_body(marker_title: &str, payload: &DetailPayload) -> PopupBody {
    let title = if payload.house_name.is_empty() {
        marker_title.to_string()
    } else {
        payload.house_name.clone()
    };

    if payload.unavailable {
        return PopupBody::Unavailable {
            title,
            message: UNAVAILABLE_MESSAGE.to_string(),
        };
    }

    PopupBody::Detail {
        title,
        address: payload
            .address
            .clone()
            .unwrap_or_else(|| NO_ADDRESS_LABEL.to_string()),
        house_type: payload
            .house_type
            .clone()
            .unwrap_or_else(|| DEFAULT_HOUSE_TYPE.to_string()),
        receipt_start: format_receipt_date(payload.receipt_start.as_deref()),
        attributes: payload
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    }
}
