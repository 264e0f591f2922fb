//! High-level entry point tying configuration, metadata and profile fetching together.

use foldhash::HashMap;
use serde_json::Value;
use std::io;
use std::sync::Arc;
use tracing::debug;

use crate::api;
use crate::config::Config;
use crate::data;
use crate::error::Result;
use crate::http::{HttpTransport, Transport};
use crate::index::Index;
use crate::model::{Language, RawProfile};
use crate::normalize::normalize;
use crate::profile::Profile;

/// Profile client. Loaded indexes stay resident for the client's lifetime.
///
/// Index refreshes take `&mut self`; share a loaded [`Index`] through
/// [`Client::index`] to read it from several tasks.
pub struct Client<T = HttpTransport> {
    config: Config,
    transport: T,
    indexes: HashMap<Language, Arc<Index>>,
}

impl Client<HttpTransport> {
    pub fn new(config: Config) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self {
            config,
            transport,
            indexes: HashMap::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The resident index of `language`, if it has been loaded.
    pub fn index(&self, language: Language) -> Option<Arc<Index>> {
        self.indexes.get(&language).cloned()
    }

    /// Downloads missing or outdated index files for every configured
    /// language and (re)loads them into memory.
    ///
    /// Parsing runs on tokio's blocking pool.
    ///
    /// Call this periodically to pick up new resource versions.
    pub async fn ensure_index(&mut self) -> Result<()> {
        let remote = data::fetch_remote_marker(&self.config, &self.transport).await;
        for language in self.config.languages() {
            self.provision(language, remote.as_ref()).await?;
        }
        Ok(())
    }

    /// Downloads what `language` lacks, loads it, then records the remote
    /// marker. A set that does not load leaves the marker as it was, so the
    /// next call downloads it again.
    async fn provision(&mut self, language: Language, remote: Option<&Value>) -> Result<Arc<Index>> {
        let refresh =
            data::ensure_language(&self.config, &self.transport, language, remote).await?;
        debug!(%language, downloaded = refresh.downloaded, "loading index");

        let dir = self.config.language_dir(language);
        let index = tokio::task::spawn_blocking(move || Index::load(&dir))
            .await
            .map_err(io::Error::other)??;
        if let Some(marker) = refresh.marker {
            data::record_marker(&self.config, language, marker).await?;
        }

        let index = Arc::new(index);
        self.indexes.insert(language, Arc::clone(&index));
        Ok(index)
    }

    /// The API response for `uid` in the canonical wire model.
    pub async fn fetch_raw(&self, uid: &str) -> Result<Option<RawProfile>> {
        api::fetch_raw(&self.config, &self.transport, uid).await
    }

    /// Fetches and normalizes the profile of `uid`; `language` defaults to
    /// the configured one.
    pub async fn fetch_profile(
        &mut self,
        uid: &str,
        language: Option<Language>,
    ) -> Result<Option<Profile>> {
        let raw = self.fetch_raw(uid).await?;
        self.parse_profile(raw.as_ref(), language).await
    }

    /// Normalizes an already fetched profile, loading the index of the
    /// target language first if it is not resident.
    pub async fn parse_profile(
        &mut self,
        raw: Option<&RawProfile>,
        language: Option<Language>,
    ) -> Result<Option<Profile>> {
        let Some(raw) = raw.filter(|raw| raw.detail_info.is_some()) else {
            return Ok(None);
        };
        let language = language.unwrap_or(self.config.language);
        let index = match self.indexes.get(&language) {
            Some(index) => Arc::clone(index),
            None => {
                let remote = data::fetch_remote_marker(&self.config, &self.transport).await;
                self.provision(language, remote.as_ref()).await?
            }
        };
        Ok(normalize(raw, &index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LocalizationMode;
    use crate::data::INDEX_FILES;
    use crate::error::Error;
    use crate::http::tests::FakeTransport;
    use crate::index::tests::write_fixture;
    use serde_json::json;
    use std::path::Path;

    const RES: &str = "http://res.test/";
    const API: &str = "http://api.test/sr_info/";

    fn client(cache: &Path, mode: LocalizationMode) -> Client<FakeTransport> {
        let config = Config::default()
            .with_index_path(cache)
            .with_res_url(RES)
            .with_api_url(API)
            .with_mode(mode);
        Client::with_transport(config, FakeTransport::default())
    }

    /// Publishes the fixture index for `language` on the fake resource host.
    fn publish(client: &Client<FakeTransport>, language: Language) {
        let source = tempfile::tempdir().unwrap();
        write_fixture(source.path());
        for file in INDEX_FILES {
            let body = std::fs::read(source.path().join(file)).unwrap();
            client
                .transport()
                .serve(client.config().index_url(language, file), body);
        }
        client
            .transport()
            .serve(format!("{RES}info.json"), br#"{"version": "1"}"#.to_vec());
    }

    fn index_requests(client: &Client<FakeTransport>) -> usize {
        client
            .transport()
            .requests()
            .iter()
            .filter(|url| url.contains("/index_min/"))
            .count()
    }

    fn sample_profile() -> Vec<u8> {
        json!({
            "detailInfo": {
                "uid": 100000001,
                "nickname": "Caelus",
                "headIcon": 200001,
                "assistAvatarDetail": {"avatarId": 8002, "level": 80},
                "avatarDetailList": [
                    {"avatarId": 1001, "level": 80, "equipment": {"tid": 21000, "level": 80, "promotion": 1}},
                    {"avatarId": 8002, "level": 80}
                ]
            }
        })
        .to_string()
        .into_bytes()
    }

    #[tokio::test]
    async fn test_ensure_all_languages_writes_every_file() {
        let cache = tempfile::tempdir().unwrap();
        let mut client = client(cache.path(), LocalizationMode::All);
        for language in Language::ALL {
            publish(&client, language);
        }

        client.ensure_index().await.unwrap();

        for language in Language::ALL {
            for file in INDEX_FILES {
                assert!(
                    cache.path().join(language.code()).join(file).exists(),
                    "{file} missing for {language}"
                );
            }
            assert!(client.index(language).is_some());
        }
    }

    #[tokio::test]
    async fn test_ensure_twice_with_same_marker_downloads_nothing() {
        let cache = tempfile::tempdir().unwrap();
        let mut client = client(cache.path(), LocalizationMode::Single);
        publish(&client, Language::En);

        client.ensure_index().await.unwrap();
        assert_eq!(index_requests(&client), INDEX_FILES.len());
        client.transport().clear_requests();

        client.ensure_index().await.unwrap();
        assert_eq!(index_requests(&client), 0);
        assert_eq!(
            client.transport().requests(),
            vec![format!("{RES}info.json")]
        );
    }

    #[tokio::test]
    async fn test_ensure_reports_missing_file() {
        let cache = tempfile::tempdir().unwrap();
        let mut client = client(cache.path(), LocalizationMode::Single);
        publish(&client, Language::En);
        client
            .transport()
            .forget(&client.config().index_url(Language::En, "avatars.json"));

        let err = client.ensure_index().await.unwrap_err();
        assert!(matches!(
            err,
            Error::IndexDownload { ref file, language: Language::En } if file == "avatars.json"
        ));
        assert!(client.index(Language::En).is_none());
    }

    #[tokio::test]
    async fn test_unloadable_index_is_downloaded_again() {
        let cache = tempfile::tempdir().unwrap();
        let mut client = client(cache.path(), LocalizationMode::Single);
        publish(&client, Language::En);
        let avatars = client.config().index_url(Language::En, "avatars.json");
        let good = client.transport().bodies.lock().unwrap()[&avatars].clone();
        client
            .transport()
            .serve(avatars.as_str(), br#"["not", "a", "map"]"#.to_vec());

        let err = client.ensure_index().await.unwrap_err();
        assert!(matches!(err, Error::IndexLoad { ref file, .. } if file == "avatars.json"));
        assert!(client.index(Language::En).is_none());
        assert!(data::read_local_markers(client.config()).await.is_empty());

        client.transport().serve(avatars.as_str(), good);
        client.transport().clear_requests();
        client.ensure_index().await.unwrap();

        assert_eq!(index_requests(&client), INDEX_FILES.len());
        assert_eq!(
            client.index(Language::En).unwrap().avatar("200001").unwrap().name,
            "Trailblazer"
        );
        assert_eq!(
            data::read_local_markers(client.config()).await.get("en"),
            Some(&json!({"version": "1"}))
        );
    }

    #[tokio::test]
    async fn test_fetch_profile_loads_index_on_demand() {
        let cache = tempfile::tempdir().unwrap();
        let mut client = client(cache.path(), LocalizationMode::Single);
        publish(&client, Language::En);
        client
            .transport()
            .serve(format!("{API}100000001"), sample_profile());

        let profile = client
            .fetch_profile("100000001", None)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(profile.player.avatar.name, "Trailblazer");
        let names: Vec<&str> = profile.characters.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Caelus", "March 7th"]);
        let light_cone = profile.characters[1].light_cone.as_ref().unwrap();
        assert_eq!(light_cone.name, "Post-Op Conversation");
        assert!(client.index(Language::En).is_some());
    }

    #[tokio::test]
    async fn test_language_override_provisions_that_language() {
        let cache = tempfile::tempdir().unwrap();
        let mut client = client(cache.path(), LocalizationMode::Single);
        publish(&client, Language::Jp);
        client
            .transport()
            .serve(format!("{API}100000001"), sample_profile());

        let profile = client
            .fetch_profile("100000001", Some(Language::Jp))
            .await
            .unwrap();
        assert!(profile.is_some());
        assert!(client.index(Language::Jp).is_some());
        assert!(client.index(Language::En).is_none());
        assert!(cache.path().join("jp").join("characters.json").exists());
    }

    #[tokio::test]
    async fn test_unknown_player_is_none_without_touching_index() {
        let cache = tempfile::tempdir().unwrap();
        let mut client = client(cache.path(), LocalizationMode::Single);

        let profile = client.fetch_profile("404", None).await.unwrap();
        assert!(profile.is_none());
        assert_eq!(client.transport().requests(), vec![format!("{API}404")]);
    }

    #[tokio::test]
    async fn test_profile_without_detail_is_none() {
        let cache = tempfile::tempdir().unwrap();
        let mut client = client(cache.path(), LocalizationMode::Single);
        client
            .transport()
            .serve(format!("{API}7"), br#"{"detail": "user not found"}"#.to_vec());

        assert!(client.fetch_profile("7", None).await.unwrap().is_none());
        assert_eq!(index_requests(&client), 0);
    }

    #[tokio::test]
    async fn test_malformed_profile_is_decode_error() {
        let cache = tempfile::tempdir().unwrap();
        let mut client = client(cache.path(), LocalizationMode::Single);
        client
            .transport()
            .serve(format!("{API}8"), b"{\"detailInfo\":".to_vec());

        let err = client.fetch_profile("8", None).await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
