//! Response bodies returned by the mocked lookup services

use serde_json::{Value, json};

/// Postal code used across scenarios
pub const POSTAL_CODE: &str = "01153000";

/// BrasilAPI-shaped body with only street, city and state
pub fn brasil_api_rua_x() -> Value {
    json!({
        "street": "Rua X",
        "city": "São Paulo",
        "state": "SP"
    })
}

/// Full BrasilAPI-shaped body for the default postal code
pub fn brasil_api_body() -> Value {
    json!({
        "cep": "01153000",
        "state": "SP",
        "city": "São Paulo",
        "neighborhood": "Barra Funda",
        "street": "Rua Vitorino Carmilo",
        "service": "open-cep"
    })
}

/// Full ViaCEP-shaped body for the default postal code
pub fn via_cep_body() -> Value {
    json!({
        "cep": "01153-000",
        "logradouro": "Rua Vitorino Carmilo",
        "complemento": "",
        "bairro": "Barra Funda",
        "localidade": "São Paulo",
        "uf": "SP",
        "ibge": "3550308",
        "ddd": "11"
    })
}
