//! Draft-notice rendering with memoised translation.

use consumershield_ai::{
    GenerativeProvider, TRANSLATION_FAILED, TRANSLATION_UNAVAILABLE, Translator,
};
use consumershield_core::SupportedLanguage;
use consumershield_store::{KvStore, TranslationCache};
use tracing::info;

/// Translator plus the cache consulted before every provider call.
pub struct NoticeSession<P, S> {
    translator: Translator<P>,
    cache: TranslationCache<S>,
}

impl<P: GenerativeProvider, S: KvStore> NoticeSession<P, S> {
    pub fn new(translator: Translator<P>, cache: TranslationCache<S>) -> Self {
        Self { translator, cache }
    }

    /// Case `case_id`'s notice in `language`. Only real translations are
    /// cached, so a transient failure is retried next time.
    pub async fn render(
        &self,
        case_id: &str,
        notice: &str,
        language: SupportedLanguage,
    ) -> String {
        if language.is_base() {
            return notice.to_string();
        }
        if let Some(hit) = self.cache.get(case_id, language, notice) {
            info!(case_id, language = %language, "translation served from cache");
            return hit;
        }

        let translated = self.translator.translate(notice, language).await;
        if translated != TRANSLATION_FAILED && translated != TRANSLATION_UNAVAILABLE {
            self.cache.put(case_id, language, notice, &translated);
        }
        translated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use consumershield_ai::{
        AnalysisConfig, ApiKey, CredentialSource, GenerateRequest, Part, ProviderError,
    };
    use consumershield_store::{FileStore, MemoryStore};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct CountingProvider {
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl GenerativeProvider for CountingProvider {
        async fn generate(
            &self,
            _key: &ApiKey,
            _request: &GenerateRequest,
        ) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply
                .map(String::from)
                .ok_or(ProviderError::Status {
                    status: 503,
                    message: "overloaded".into(),
                })
        }
    }

    /// Replies with the last line of the prompt, i.e. the notice itself.
    struct EchoProvider;

    #[async_trait]
    impl GenerativeProvider for EchoProvider {
        async fn generate(
            &self,
            _key: &ApiKey,
            request: &GenerateRequest,
        ) -> Result<String, ProviderError> {
            let prompt = match request.parts.last() {
                Some(Part::Text(text)) => text.as_str(),
                _ => "",
            };
            Ok(format!("HI:{}", prompt.lines().last().unwrap_or_default()))
        }
    }

    fn session<S: KvStore>(
        reply: Option<&'static str>,
        store: S,
    ) -> (Arc<CountingProvider>, NoticeSession<Arc<CountingProvider>, S>) {
        let provider = Arc::new(CountingProvider {
            reply,
            calls: AtomicUsize::new(0),
        });
        let translator = Translator::new(
            provider.clone(),
            CredentialSource::Fixed(Some("k".into())),
            &AnalysisConfig::default(),
        );
        (provider, NoticeSession::new(translator, TranslationCache::new(store)))
    }

    const NOTICE: &str = "To,\nThe Manager\n\nSub: Notice under Section 2(11)";

    #[tokio::test]
    async fn second_render_is_served_from_cache() {
        let (provider, s) = session(Some("प्रति,\nप्रबंधक"), MemoryStore::new());
        let first = s.render("case-1", NOTICE, SupportedLanguage::Hindi).await;
        let second = s.render("case-1", NOTICE, SupportedLanguage::Hindi).await;
        assert_eq!(first, "प्रति,\nप्रबंधक");
        assert_eq!(second, first);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn base_language_never_calls_provider() {
        let (provider, s) = session(Some("unused"), MemoryStore::new());
        assert_eq!(s.render("case-1", NOTICE, SupportedLanguage::English).await, NOTICE);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn languages_are_cached_separately() {
        let (provider, s) = session(Some("translated"), MemoryStore::new());
        s.render("case-1", NOTICE, SupportedLanguage::Tamil).await;
        s.render("case-1", NOTICE, SupportedLanguage::Telugu).await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fallback_strings_are_not_cached() {
        let (provider, s) = session(None, MemoryStore::new());
        assert_eq!(
            s.render("case-1", NOTICE, SupportedLanguage::Gujarati).await,
            TRANSLATION_UNAVAILABLE
        );
        s.render("case-1", NOTICE, SupportedLanguage::Gujarati).await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn same_length_notices_of_different_cases_stay_separate() {
        let tmp = TempDir::new().unwrap();
        let store = Arc::new(FileStore::open(tmp.path()).unwrap());
        let provider = Arc::new(EchoProvider);
        let open_session = |store: Arc<FileStore>| {
            let translator = Translator::new(
                provider.clone(),
                CredentialSource::Fixed(Some("k".into())),
                &AnalysisConfig::default(),
            );
            NoticeSession::new(translator, TranslationCache::new(store))
        };

        let a = "To, Builder AAA Ltd";
        let b = "To, Insurer BBB Co.";
        let first = open_session(Arc::clone(&store))
            .render("case-a", a, SupportedLanguage::Hindi)
            .await;
        let second = open_session(Arc::clone(&store))
            .render("case-b", b, SupportedLanguage::Hindi)
            .await;

        assert!(first.ends_with(a));
        assert!(second.ends_with(b), "case-b rendered {second:?}");
    }

    #[tokio::test]
    async fn cache_survives_new_session() {
        let tmp = TempDir::new().unwrap();
        let (_, s) = session(Some("ಅನುವಾದ"), FileStore::open(tmp.path()).unwrap());
        s.render("case-1", NOTICE, SupportedLanguage::Kannada).await;

        let (provider, reopened) = session(Some("other"), FileStore::open(tmp.path()).unwrap());
        assert_eq!(
            reopened.render("case-1", NOTICE, SupportedLanguage::Kannada).await,
            "ಅನುವಾದ"
        );
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}
