use serde::{Deserialize, Serialize};

/// Church details shown across the app. Missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChurchConfig {
    pub name: String,
    /// PIX key for tithes and offerings.
    pub pix_key: String,
    pub live_url: String,
    pub live_title: String,
    pub address: String,
    pub maps_url: String,
    pub spotify_url: String,
}

impl Default for ChurchConfig {
    fn default() -> Self {
        Self {
            name: "Frutos do Espírito".to_string(),
            pix_key: "financeiro@frutosdoespirito.org".to_string(),
            live_url: "https://images.unsplash.com/photo-1511671782779-c97d3d27a1d4?q=80&w=800".to_string(),
            live_title: "Culto de Celebração e Adoração".to_string(),
            address: "Rua das Oliveiras, 123 - Centro".to_string(),
            maps_url: "https://maps.google.com".to_string(),
            spotify_url: "https://open.spotify.com/playlist/37i9dQZF1DX8977F2mXl9z".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurchEvent {
    pub id: String,
    pub title: String,
    /// Free text, as typed by the administrator ("10 Dezembro, 2024").
    pub date: String,
    pub time: String,
    pub location: String,
    pub image: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sermon {
    pub id: String,
    pub title: String,
    pub speaker: String,
    pub date: String,
    pub thumbnail: String,
    pub duration: String,
    pub video_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: String,
    pub url: String,
    pub title: String,
    pub category: String,
}

/// A home group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub id: String,
    pub name: String,
    pub host: String,
    pub day: String,
    pub time: String,
    pub location: String,
    pub members: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppData {
    pub config: ChurchConfig,
    pub events: Vec<ChurchEvent>,
    pub sermons: Vec<Sermon>,
    pub gallery: Vec<GalleryImage>,
    pub cells: Vec<Cell>,
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            config: ChurchConfig::default(),
            events: default_events(),
            sermons: default_sermons(),
            gallery: default_gallery(),
            cells: default_cells(),
        }
    }
}

pub(crate) fn default_events() -> Vec<ChurchEvent> {
    vec![ChurchEvent {
        id: "1".to_string(),
        title: "Workshop de Louvor".to_string(),
        date: "10 Dezembro, 2024".to_string(),
        time: "09:00 - 17:00".to_string(),
        location: "Auditório Principal".to_string(),
        image: "https://images.unsplash.com/photo-1514525253361-b83f859b73c0?q=80&w=800".to_string(),
        price: "Grátis".to_string(),
    }]
}

pub(crate) fn default_sermons() -> Vec<Sermon> {
    vec![Sermon {
        id: "1".to_string(),
        title: "Como Vencer o Medo".to_string(),
        speaker: "Pr. Márcio Silva".to_string(),
        date: "Há 2 dias".to_string(),
        thumbnail: "https://images.unsplash.com/photo-1438029071396-1e831a7fa6d8?q=80&w=400".to_string(),
        duration: "45:20".to_string(),
        video_url: "https://storage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4".to_string(),
    }]
}

pub(crate) fn default_gallery() -> Vec<GalleryImage> {
    vec![GalleryImage {
        id: "1".to_string(),
        url: "https://images.unsplash.com/photo-1511671782779-c97d3d27a1d4?q=80&w=800".to_string(),
        title: "Culto de Domingo".to_string(),
        category: "Cultos".to_string(),
    }]
}

pub(crate) fn default_cells() -> Vec<Cell> {
    let cell = |id: &str, name: &str, host: &str, day: &str, time: &str, location: &str, members| Cell {
        id: id.to_string(),
        name: name.to_string(),
        host: host.to_string(),
        day: day.to_string(),
        time: time.to_string(),
        location: location.to_string(),
        members,
    };
    vec![
        cell("1", "Célula Boas Novas", "João & Maria", "Quarta-feira", "20:00", "Bairro Centro", 12),
        cell("2", "Célula Koinonia", "Carlos Rocha", "Terça-feira", "19:30", "Bairro Jardim", 8),
    ]
}
