use super::*;
use async_trait::async_trait;
use cinemateca_models::{ImageKind, OfferType};
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::Layer;

#[derive(Clone)]
enum Reply {
    Body(Value),
    NotFound,
    Status(u16),
    /// Connection refused on a closed local port
    Transport,
    Slow(Duration, Value),
}

impl Reply {
    async fn into_result(self) -> Result<Value, SourceError> {
        match self {
            Reply::Body(body) => Ok(body),
            Reply::NotFound => Err(SourceError::NotFound),
            Reply::Status(status) => Err(SourceError::Status {
                status,
                body: "upstream exploded".to_string(),
            }),
            Reply::Transport => {
                let err = reqwest::Client::new()
                    .get("http://127.0.0.1:9/")
                    .send()
                    .await
                    .expect_err("nothing listens on port 9");
                Err(SourceError::Http(err))
            }
            Reply::Slow(delay, body) => {
                tokio::time::sleep(delay).await;
                Ok(body)
            }
        }
    }
}

/// In-memory catalog keyed by `{kind}/{id}` and `{kind}/{id}/{resource}`
#[derive(Default)]
struct FakeSource {
    replies: HashMap<String, Reply>,
    genres: HashMap<MediaKind, Value>,
}

impl FakeSource {
    fn with_detail(mut self, kind: MediaKind, id: &str, reply: Reply) -> Self {
        self.replies.insert(format!("{}/{}", kind, id), reply);
        self
    }

    fn with_sub(mut self, kind: MediaKind, id: &str, resource: SubResource, reply: Reply) -> Self {
        self.replies.insert(format!("{}/{}/{}", kind, id, resource), reply);
        self
    }

    fn with_genres(mut self, kind: MediaKind, body: Value) -> Self {
        self.genres.insert(kind, body);
        self
    }

    fn reply(&self, key: &str) -> Reply {
        self.replies.get(key).cloned().unwrap_or(Reply::NotFound)
    }
}

#[async_trait]
impl CatalogSource for FakeSource {
    fn source_name(&self) -> &str {
        "fake"
    }

    async fn get_details(&self, kind: MediaKind, id: &str) -> Result<Value, SourceError> {
        self.reply(&format!("{}/{}", kind, id)).into_result().await
    }

    async fn get_sub_resource(
        &self,
        kind: MediaKind,
        id: &str,
        resource: SubResource,
    ) -> Result<Value, SourceError> {
        self.reply(&format!("{}/{}/{}", kind, id, resource)).into_result().await
    }

    async fn get_genres(&self, kind: MediaKind) -> Result<Value, SourceError> {
        self.genres.get(&kind).cloned().ok_or(SourceError::NotFound)
    }
}

fn settings() -> ServiceSettings {
    ServiceSettings {
        region: "ES".to_string(),
        placeholder_profile_url: "https://example.com/nobody.png".to_string(),
        image_base_url: "https://image.tmdb.org/t/p".to_string(),
        timeout: Duration::from_millis(200),
    }
}

fn service(source: FakeSource) -> CatalogService {
    CatalogService::new(Arc::new(source), settings())
}

fn fight_club_detail() -> Value {
    json!({
        "id": 550,
        "title": "Fight Club",
        "original_title": "Fight Club",
        "overview": "A ticking-time-bomb insomniac...",
        "release_date": "1999-10-15",
        "runtime": 139,
        "vote_average": 8.433,
        "poster_path": "/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg",
        "backdrop_path": "/hZkgoQYus5vegHoetLkCJzb17zJ.jpg",
        "genres": [{ "id": 18, "name": "Drama" }, { "id": 53, "name": "Thriller" }]
    })
}

fn fight_club_credits() -> Value {
    json!({
        "id": 550,
        "cast": [
            { "id": 819, "name": "Edward Norton", "character": "The Narrator", "profile_path": "/norton.jpg" },
            { "id": 287, "name": "Brad Pitt", "character": "Tyler Durden" }
        ],
        "crew": [{ "id": 7467, "name": "David Fincher", "job": "Director" }]
    })
}

fn fight_club_videos() -> Value {
    json!({ "id": 550, "results": [
        { "id": "5c9294240e0a267cd516835f", "name": "Fight Club | #TBT Trailer", "key": "BdJKm16Co6M", "site": "YouTube", "type": "Trailer" }
    ]})
}

fn fight_club_providers() -> Value {
    json!({ "id": 550, "results": { "ES": {
        "flatrate": [{ "provider_id": 8, "provider_name": "Netflix", "logo_path": "/netflix.jpg" }],
        "rent": [
            { "provider_id": 2, "provider_name": "Apple TV", "logo_path": "/apple.jpg" },
            { "provider_id": 8, "provider_name": "Netflix", "logo_path": "/netflix.jpg" }
        ],
        "buy": [{ "provider_id": 2, "provider_name": "Apple TV", "logo_path": "/apple.jpg" }]
    }}})
}

fn fight_club_images() -> Value {
    json!({ "id": 550,
        "backdrops": [{ "file_path": "/bd1.jpg", "width": 1920, "height": 1080 }],
        "posters": [{ "file_path": "/p1.jpg", "width": 500, "height": 750 }]
    })
}

fn fight_club(source: FakeSource) -> FakeSource {
    let kind = MediaKind::Movie;
    source
        .with_detail(kind, "550", Reply::Body(fight_club_detail()))
        .with_sub(kind, "550", SubResource::Credits, Reply::Body(fight_club_credits()))
        .with_sub(kind, "550", SubResource::Videos, Reply::Body(fight_club_videos()))
        .with_sub(kind, "550", SubResource::WatchProviders, Reply::Body(fight_club_providers()))
        .with_sub(kind, "550", SubResource::Images, Reply::Body(fight_club_images()))
}

#[tokio::test]
async fn test_full_movie_aggregation() {
    let service = service(fight_club(FakeSource::default()));
    let report = service.get_media_report("550", MediaKind::Movie).await.unwrap();
    assert!(report.is_complete());

    let movie = report.media.as_movie().unwrap();
    assert_eq!(movie.base.id, "550");
    assert_eq!(movie.base.title, "Fight Club");
    assert_eq!(movie.base.rating, 8.433);
    assert_eq!(movie.runtime_minutes, 139);
    assert_eq!(movie.base.genres, vec!["Drama".to_string(), "Thriller".to_string()]);
    assert_eq!(
        movie.base.poster_url,
        "https://image.tmdb.org/t/p/w500/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg"
    );
    assert_eq!(movie.base.cast.len(), 2);
    assert_eq!(movie.base.cast[1].photo_url, "https://example.com/nobody.png");
    assert_eq!(movie.director.as_ref().unwrap().name, "David Fincher");
    assert_eq!(movie.base.trailers.len(), 1);
    assert_eq!(movie.base.trailers[0].provider_key, "BdJKm16Co6M");

    let providers: Vec<_> = movie
        .base
        .watch_providers
        .iter()
        .map(|p| (p.id.as_str(), p.offer_type))
        .collect();
    assert_eq!(providers, vec![("8", OfferType::Flatrate), ("2", OfferType::Rent)]);

    assert_eq!(movie.base.wallpapers.len(), 2);
    assert_eq!(movie.base.wallpapers[0].kind, ImageKind::Backdrop);
    assert_eq!(movie.base.wallpapers[1].kind, ImageKind::Poster);
}

#[tokio::test]
async fn test_failed_providers_degrade_to_empty() {
    let source = fight_club(FakeSource::default()).with_sub(
        MediaKind::Movie,
        "550",
        SubResource::WatchProviders,
        Reply::Transport,
    );
    let service = service(source);

    let report = service.get_media_report("550", MediaKind::Movie).await.unwrap();
    let movie = report.media.as_movie().unwrap();
    assert_eq!(movie.base.title, "Fight Club");
    assert!(movie.base.watch_providers.is_empty());
    assert_eq!(movie.base.cast.len(), 2);
    assert_eq!(movie.base.trailers.len(), 1);

    assert_eq!(report.degraded.len(), 1);
    assert!(report.is_degraded(SubResource::WatchProviders));
    assert!(report.degraded[0].reason.starts_with("upstream request failed"));

    let media = service.get_media_by_id("550", MediaKind::Movie).await.unwrap();
    let json = serde_json::to_value(&media).unwrap();
    assert_eq!(json["watchProviders"], json!([]));
    assert_eq!(json["mediaType"], "movie");
}

#[tokio::test]
async fn test_every_sub_resource_failing_still_yields_entity() {
    let source = FakeSource::default().with_detail(MediaKind::Movie, "550", Reply::Body(fight_club_detail()));
    let report = service(source).get_media_report("550", MediaKind::Movie).await.unwrap();

    assert_eq!(report.degraded.len(), 4);
    let base = report.media.base();
    assert!(base.cast.is_empty());
    assert!(base.trailers.is_empty());
    assert!(base.watch_providers.is_empty());
    assert!(base.wallpapers.is_empty());
    assert!(report.media.as_movie().unwrap().director.is_none());
}

#[tokio::test]
async fn test_malformed_sub_resource_body_degrades() {
    let source = fight_club(FakeSource::default()).with_sub(
        MediaKind::Movie,
        "550",
        SubResource::Credits,
        Reply::Body(json!(["not", "an", "object"])),
    );
    let report = service(source).get_media_report("550", MediaKind::Movie).await.unwrap();
    assert!(report.is_degraded(SubResource::Credits));
    assert!(report.media.base().cast.is_empty());
    assert!(report.media.as_movie().unwrap().director.is_none());
}

#[tokio::test]
async fn test_missing_detail_is_not_found() {
    let service = service(FakeSource::default());
    let err = service.get_media_by_id("999999", MediaKind::Movie).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(
        err,
        CatalogError::NotFound { kind: MediaKind::Movie, ref id } if id == "999999"
    ));
}

#[tokio::test]
async fn test_id_less_detail_is_not_found() {
    for body in [json!({}), json!({ "title": "Ghost" }), json!(null), json!({ "id": "" })] {
        let source = fight_club(FakeSource::default()).with_detail(MediaKind::Movie, "550", Reply::Body(body));
        let err = service(source).get_media_by_id("550", MediaKind::Movie).await.unwrap_err();
        assert!(err.is_not_found(), "unexpected {:?}", err);
    }
}

#[tokio::test]
async fn test_blank_id_is_not_found() {
    let err = service(FakeSource::default())
        .get_media_by_id("   ", MediaKind::Tv)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_detail_server_error_is_upstream() {
    let source = fight_club(FakeSource::default()).with_detail(MediaKind::Movie, "550", Reply::Status(500));
    let err = service(source).get_media_by_id("550", MediaKind::Movie).await.unwrap_err();
    assert!(matches!(err, CatalogError::Upstream(SourceError::Status { status: 500, .. })));
}

#[tokio::test]
async fn test_slow_sub_resource_degrades() {
    let source = fight_club(FakeSource::default()).with_sub(
        MediaKind::Movie,
        "550",
        SubResource::Videos,
        Reply::Slow(Duration::from_secs(5), fight_club_videos()),
    );
    let started = Instant::now();
    let report = service(source).get_media_report("550", MediaKind::Movie).await.unwrap();

    assert!(started.elapsed() < Duration::from_secs(2));
    assert!(report.is_degraded(SubResource::Videos));
    assert!(report.media.base().trailers.is_empty());
    assert_eq!(report.media.base().cast.len(), 2);
}

#[tokio::test]
async fn test_slow_detail_fails() {
    let source = fight_club(FakeSource::default()).with_detail(
        MediaKind::Movie,
        "550",
        Reply::Slow(Duration::from_secs(5), fight_club_detail()),
    );
    let err = service(source).get_media_by_id("550", MediaKind::Movie).await.unwrap_err();
    assert!(matches!(err, CatalogError::Upstream(ref e) if e.is_timeout()));
}

#[tokio::test]
async fn test_series_aggregation() {
    let kind = MediaKind::Tv;
    let source = FakeSource::default()
        .with_detail(
            kind,
            "1399",
            Reply::Body(json!({
                "id": 1399,
                "name": "Game of Thrones",
                "first_air_date": "2011-04-17",
                "number_of_seasons": 8,
                "number_of_episodes": 73,
                "vote_average": 8.4,
                "created_by": [
                    { "id": 9813, "name": "David Benioff", "profile_path": "/db.jpg" },
                    { "id": 228068, "name": "D. B. Weiss" }
                ],
                "genres": [{ "id": 10765, "name": "Sci-Fi & Fantasy" }]
            })),
        )
        .with_sub(
            kind,
            "1399",
            SubResource::Credits,
            Reply::Body(json!({ "cast": [{ "id": 22970, "name": "Peter Dinklage", "character": "Tyrion Lannister" }] })),
        );

    let report = service(source).get_media_report("1399", kind).await.unwrap();
    let series = report.media.as_series().unwrap();
    assert_eq!(series.base.title, "Game of Thrones");
    assert_eq!(series.season_count, 8);
    assert_eq!(series.episode_count, 73);
    assert_eq!(series.creators.len(), 2);
    assert_eq!(series.creators[0].photo_url, "https://image.tmdb.org/t/p/w185/db.jpg");
    assert_eq!(series.base.cast[0].character, "Tyrion Lannister");
    assert_eq!(report.degraded.len(), 3);
}

#[tokio::test]
async fn test_legacy_spanish_detail() {
    let kind = MediaKind::Movie;
    let source = FakeSource::default()
        .with_detail(
            kind,
            "4935",
            Reply::Body(json!({
                "id": "4935",
                "titulo": "El laberinto del fauno",
                "title": "Pan's Labyrinth",
                "fecha": "2006-10-11",
                "puntuacion": "7,8",
                "duracion": 118,
                "generos": ["Fantasía", "Drama"]
            })),
        )
        .with_sub(kind, "4935", SubResource::Credits, Reply::Body(json!({ "cast": [] })));

    let movie = service(source).get_media_by_id("4935", kind).await.unwrap();
    assert_eq!(movie.title(), "El laberinto del fauno");
    assert_eq!(movie.base().release_date, "2006-10-11");
    assert_eq!(movie.base().rating, 7.8);
    assert_eq!(movie.as_movie().unwrap().runtime_minutes, 118);
}

#[tokio::test]
async fn test_report_serializes_degraded_resources() {
    let source = FakeSource::default().with_detail(MediaKind::Movie, "550", Reply::Body(fight_club_detail()));
    let report = service(source).get_media_report("550", MediaKind::Movie).await.unwrap();
    let json = serde_json::to_value(&report).unwrap();

    let resources: Vec<_> = json["degraded"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["resource"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(resources, vec!["credits", "videos", "watch_providers", "images"]);
    assert_eq!(json["media"]["title"], "Fight Club");
}

#[tokio::test]
async fn test_get_genres_annotates_entries() {
    let source = FakeSource::default().with_genres(
        MediaKind::Movie,
        json!({ "genres": [{ "id": 28, "name": "Acción" }, { "id": 878, "name": "Ciencia ficción" }] }),
    );
    let service = service(source);

    let genres = service.get_genres(MediaKind::Movie).await.unwrap();
    assert_eq!(genres.len(), 2);
    assert_eq!(genres[0].canonical.as_deref(), Some("action"));
    assert_eq!(genres[1].canonical.as_deref(), Some("science fiction"));

    let err = service.get_genres(MediaKind::Tv).await.unwrap_err();
    assert!(matches!(err, CatalogError::Upstream(SourceError::NotFound)));
}

#[tokio::test]
async fn test_get_wallpapers() {
    let service = service(fight_club(FakeSource::default()));
    let wallpapers = service.get_wallpapers("550", MediaKind::Movie).await;
    assert_eq!(wallpapers.len(), 2);
    assert_eq!(wallpapers[0].url, "https://image.tmdb.org/t/p/original/bd1.jpg");
    assert_eq!(wallpapers[0].width, 1920);
    assert_eq!(wallpapers[1].url, "https://image.tmdb.org/t/p/w500/p1.jpg");

    assert!(service.get_wallpapers("404", MediaKind::Movie).await.is_empty());
}

#[tokio::test]
async fn test_server_error_on_providers_degrades() {
    let source = fight_club(FakeSource::default()).with_sub(
        MediaKind::Movie,
        "550",
        SubResource::WatchProviders,
        Reply::Status(503),
    );
    let report = service(source).get_media_report("550", MediaKind::Movie).await.unwrap();
    assert!(report.is_degraded(SubResource::WatchProviders));
    assert!(report.degraded[0].reason.contains("503"));
}

/// Counts WARN events seen by the current thread's subscriber
#[derive(Clone, Default)]
struct WarnCounter(Arc<AtomicUsize>);

impl WarnCounter {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == tracing::Level::WARN {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[tokio::test]
async fn test_missing_title_logs_no_degraded_warnings() {
    let warnings = WarnCounter::default();
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(warnings.clone()));

    // Every sub-resource fails too, but there is no entity to degrade
    let err = service(FakeSource::default())
        .get_media_by_id("999999", MediaKind::Movie)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(warnings.count(), 0);

    let source = fight_club(FakeSource::default()).with_detail(MediaKind::Movie, "550", Reply::Body(json!({})));
    assert!(service(source).get_media_by_id("550", MediaKind::Movie).await.is_err());
    assert_eq!(warnings.count(), 0);

    let source = fight_club(FakeSource::default()).with_sub(
        MediaKind::Movie,
        "550",
        SubResource::WatchProviders,
        Reply::Status(503),
    );
    service(source).get_media_report("550", MediaKind::Movie).await.unwrap();
    assert_eq!(warnings.count(), 1);
}
