//! Fixed option lists offered by the request form.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Placeholder entries that mean "nothing selected yet".
pub const BLANK_OPTION: &str = " ";
pub const ADD_NEW_CLIENT_OPTION: &str = "+ Add New";

pub const CONTAINER_TYPES: &[&str] = &[
    "20' Dry Standard",
    "40' Dry Standard",
    "40' Dry High Cube",
    "Reefer 20'",
    "Reefer 40'",
    "Open Top 20'",
    "Open Top 40'",
    "Flat Rack 20'",
    "Flat Rack 40'",
];

pub const SERVICE_TYPES: &[&str] = &["Flete Internacional", "Transporte Terrestre", "Agenciamiento"];

/// Contact card printed on the document for a sales representative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SalesRep {
    pub name: String,
    pub title: String,
    pub phone: String,
    pub email: String,
}

struct RepEntry {
    name: &'static str,
    title: &'static str,
    phone: &'static str,
    email: &'static str,
}

const SALES_REPS: &[RepEntry] = &[
    RepEntry {
        name: "Pedro Luis Bruges",
        title: "Global Sales Manager",
        phone: "+57 (304) 4969358",
        email: "sales@tradingsolutions.com",
    },
    RepEntry {
        name: "Andrés Consuegra",
        title: "CEO",
        phone: "+57 (301) 7542622",
        email: "manager@tradingsolutions.com",
    },
    RepEntry {
        name: "Ivan Zuluaga",
        title: "Business Development Manager Latam & USA",
        phone: "+57 (300) 5734657",
        email: "sales5@tradingsolutions.com",
    },
    RepEntry {
        name: "Sharon Zuñiga",
        title: "Business Development Manager Latam & USA",
        phone: "+57 (300) 510 0295",
        email: "sales2@tradingsolutions.com",
    },
    RepEntry {
        name: "Johnny Farah",
        title: "Manager of Americas",
        phone: "+57 (301) 6671725",
        email: "sales3@tradingsolutions.com",
    },
    RepEntry {
        name: "Jorge Sánchez",
        title: "Reefer Department Manager",
        phone: "+57 (301) 7753510",
        email: "sales4@tradingsolutions.com",
    },
    RepEntry {
        name: "Irina Paternina",
        title: "Business Executive",
        phone: "+57 (301) 3173340",
        email: "sales1@tradingsolutions.com",
    },
    RepEntry {
        name: "Stephanie Bruges",
        title: "Business Development Specialist",
        phone: "+57 300 4657077",
        email: "bds@tradingsolutions.com",
    },
    RepEntry {
        name: "Catherine Silva",
        title: "Inside Sales",
        phone: "+57 304 4969351",
        email: "insidesales@tradingsolutions.com",
    },
];

/// Names selectable in the "Sales Rep" field, without the blank placeholder.
pub const SELECTABLE_REPS: &[&str] = &[
    "Pedro Luis Bruges",
    "Andrés Consuegra",
    "Ivan Zuluaga",
    "Sharon Zuñiga",
    "Johnny Farah",
    "Felipe Hoyos",
    "Jorge Sánchez",
    "Irina Paternina",
    "Stephanie Bruges",
];

/// Contact card for `name`; unknown names get `N/A` details.
pub fn sales_rep(name: &str) -> SalesRep {
    match SALES_REPS.iter().find(|rep| rep.name == name) {
        Some(rep) => SalesRep {
            name: rep.name.to_string(),
            title: rep.title.to_string(),
            phone: rep.phone.to_string(),
            email: rep.email.to_string(),
        },
        None => SalesRep {
            name: name.to_string(),
            title: "N/A".to_string(),
            phone: "N/A".to_string(),
            email: "N/A".to_string(),
        },
    }
}

/// True for blank selections and the "add new client" sentinel.
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed == ADD_NEW_CLIENT_OPTION
}
