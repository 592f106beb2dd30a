//! Studio settings: services on offer, student tags and reminder preferences

use crate::domain::ids::generate_unique_id;
use crate::domain::money::validate_price;
use crate::error::{PilarisError, Result};
use serde::{Deserialize, Serialize};

/// A bookable offering and its per-session fee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub price: f64,
}

impl Service {
    /// Create a service with a fresh id; the price must be finite and not negative
    pub fn new(name: &str, price: f64) -> Result<Self> {
        Ok(Service::preset(name, validate_price(price)?))
    }

    fn preset(name: &str, price: f64) -> Self {
        Service {
            id: generate_unique_id(),
            name: name.to_string(),
            price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub services: Vec<Service>,
    #[serde(default)]
    pub student_tags: Vec<String>,
    #[serde(default)]
    pub notifications_enabled: bool,
    #[serde(default = "default_notification_minutes")]
    pub notification_minutes: u32,
}

fn default_notification_minutes() -> u32 {
    15
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            services: vec![
                Service::preset("Pilates", 25.0),
                Service::preset("Massage Therapy", 50.0),
                Service::preset("Lymphatic Drainage", 60.0),
                Service::preset("Myofascial Release", 70.0),
            ],
            student_tags: vec![
                "Studio".to_string(),
                "Wellhub".to_string(),
                "Gympass".to_string(),
            ],
            notifications_enabled: false,
            notification_minutes: default_notification_minutes(),
        }
    }
}

impl AppSettings {
    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    /// Service new days are seeded with
    pub fn default_service_id(&self) -> Option<&str> {
        self.services.first().map(|s| s.id.as_str())
    }

    /// Append a new service and return its id
    pub fn add_service(&mut self, name: &str, price: f64) -> Result<String> {
        let service = Service::new(name, price)?;
        let id = service.id.clone();
        self.services.push(service);
        Ok(id)
    }

    /// Remove a service. The last remaining service cannot be removed.
    ///
    /// Slots still pointing at the removed id keep it and earn nothing.
    pub fn remove_service(&mut self, id: &str) -> Result<()> {
        if self.service(id).is_none() {
            return Err(PilarisError::NotFound(format!("service '{}'", id)));
        }
        if self.services.len() <= 1 {
            return Err(PilarisError::LastService);
        }
        self.services.retain(|s| s.id != id);
        Ok(())
    }

    pub fn set_service_price(&mut self, id: &str, price: f64) -> Result<()> {
        let price = validate_price(price)?;
        let service = self
            .services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| PilarisError::NotFound(format!("service '{}'", id)))?;
        service.price = price;
        Ok(())
    }

    pub fn rename_service(&mut self, id: &str, name: &str) -> Result<()> {
        let service = self
            .services
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| PilarisError::NotFound(format!("service '{}'", id)))?;
        service.name = name.to_string();
        Ok(())
    }

    /// Add a tag; returns false when it is blank or already present
    pub fn add_tag(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.student_tags.iter().any(|t| t == tag) {
            return false;
        }
        self.student_tags.push(tag.to_string());
        true
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        let before = self.student_tags.len();
        self.student_tags.retain(|t| t != tag);
        self.student_tags.len() != before
    }
}
