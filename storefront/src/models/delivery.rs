// storefront/src/models/delivery.rs

/// Pickup locations an order can be delivered to.
pub const DELIVERY_POINTS: [&str; 3] = [
  "Narva soldina 20 omniva pacautomat",
  "Narva magamarket omniva pacautomat",
  "Narva fama omniva pacautomat",
];

/// Returns the canonical pickup location for `raw`, ignoring surrounding
/// whitespace.
pub fn known_delivery_point(raw: &str) -> Option<&'static str> {
  let trimmed = raw.trim();
  DELIVERY_POINTS.iter().copied().find(|p| *p == trimmed)
}
