//! The detailed-order snapshot shape and the fields shown to the user.

use serde::{Deserialize, Serialize};

use crate::document::{Document, Mapping};
use crate::error::TypeError;

/// Key holding the order summary returned by the orders listing.
pub const ORDER_KEY: &str = "order";
/// Key holding the per-order task details.
pub const DETAILS_KEY: &str = "details";
/// Identity field of an order inside [`ORDER_KEY`].
pub const REFERENCE_NUMBER_KEY: &str = "referenceNumber";

/// Dotted identity path of a detailed order, for keyed list matching.
pub const REFERENCE_NUMBER_PATH: &str = "order.referenceNumber";

/// Build a detailed order node: `{"order": order, "details": details}`.
pub fn detailed_order(order: Document, details: Document) -> Document {
    let mut map = Mapping::with_capacity(2);
    map.insert(ORDER_KEY.to_string(), order);
    map.insert(DETAILS_KEY.to_string(), details);
    Document::Mapping(map)
}

/// Human-facing summary of one detailed order.
///
/// Everything except the reference number is optional: the vendor omits
/// fields until the order reaches the matching stage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub reference_number: String,
    pub status: Option<String>,
    pub model: Option<String>,
    pub vin: Option<String>,
    pub reservation_date: Option<String>,
    pub order_booked_date: Option<String>,
    pub odometer: Option<String>,
    pub odometer_type: Option<String>,
    pub routing_location: Option<String>,
    pub delivery_window: Option<String>,
    pub eta_to_delivery_center: Option<String>,
    pub delivery_appointment: Option<String>,
}

impl OrderSummary {
    /// Extract a summary from a detailed order node.
    pub fn from_document(doc: &Document) -> Result<Self, TypeError> {
        let order = doc
            .get(ORDER_KEY)
            .filter(|o| o.as_mapping().is_some())
            .ok_or_else(|| TypeError::MissingField(ORDER_KEY.into()))?;
        let reference_number = order
            .get(REFERENCE_NUMBER_KEY)
            .filter(|v| !v.is_null())
            .map(Document::to_string)
            .ok_or_else(|| TypeError::MissingField(REFERENCE_NUMBER_PATH.into()))?;

        let details = doc.get(DETAILS_KEY);
        let task = |path: &[&str]| -> Option<String> {
            let mut full = vec!["tasks"];
            full.extend_from_slice(path);
            details.and_then(|d| d.get_path(full.as_slice())).and_then(text)
        };
        let order_details = |field: &str| task(&["registration", "orderDetails", field]);

        Ok(Self {
            reference_number,
            status: order.get("orderStatus").and_then(text),
            model: order.get("modelCode").and_then(text),
            vin: order.get("vin").and_then(text),
            reservation_date: order_details("reservationDate"),
            order_booked_date: order_details("orderBookedDate"),
            odometer: order_details("vehicleOdometer"),
            odometer_type: order_details("vehicleOdometerType"),
            routing_location: order_details("vehicleRoutingLocation"),
            delivery_window: task(&["scheduling", "deliveryWindowDisplay"]),
            eta_to_delivery_center: task(&["finalPayment", "data", "etaToDeliveryCenter"]),
            delivery_appointment: task(&["scheduling", "apptDateTimeAddressStr"]),
        })
    }

    /// Summaries for every node of a snapshot list, in order.
    pub fn from_snapshot(snapshot: &Document) -> Result<Vec<Self>, TypeError> {
        let items = snapshot.as_sequence().ok_or(TypeError::UnexpectedShape {
            expected: "sequence",
            found: snapshot.kind().to_string(),
        })?;
        items.iter().map(Self::from_document).collect()
    }
}

fn text(doc: &Document) -> Option<String> {
    if doc.is_null() {
        None
    } else {
        Some(doc.to_string())
    }
}
