use super::models::{Episode, EpisodeList};

const SAMPLE_BUCKET: &str = "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample";

fn placeholder(id: u32, title: &str, label: &str, duration: &str, thumbnail: &str, file: &str) -> Episode {
    Episode {
        id,
        title: title.to_string(),
        label: label.to_string(),
        duration: duration.to_string(),
        thumbnail: thumbnail.to_string(),
        source_url: format!("{}/{}", SAMPLE_BUCKET, file),
    }
}

pub(crate) fn fallback_episodes() -> EpisodeList {
    EpisodeList::new(vec![
        placeholder(
            1,
            "The Final Battle Begins",
            "EP 28",
            "24:15",
            "photo-1526374965328-7f61d4dc18c5",
            "BigBuckBunny.mp4",
        ),
        placeholder(
            2,
            "Eren's Decision",
            "EP 29",
            "23:45",
            "photo-1578662996442-48f60103fc96",
            "ElephantsDream.mp4",
        ),
        placeholder(
            3,
            "The Rumbling",
            "EP 30",
            "24:30",
            "photo-1488590528505-98d2b5aba04b",
            "ForBiggerBlazes.mp4",
        ),
    ])
}
