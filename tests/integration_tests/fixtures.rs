//! Test fixtures for integration tests
//!
//! Small dictionaries and corpora for both sources.

/// Primary dictionary: `title \t\t subTitle \t\t uris \t\t entityId`
pub const PRIMARY_DICTIONARY: &str = "\
海鸥\t\t（歌曲）\t\t/item/海鸥/2::;/item/%E2%80%9C海鸥%E2%80%9D/2\t\tbdi1
南北兄弟\t\t\t\t/item/南北兄弟\t\tbdi2
顾峰\t\t（作词人）\t\t/item/顾峰/123\t\tbdi3
长城\t\t（建筑）\t\t/item/长城/14251\t\tbdi4
";

/// Primary raw corpus: one good line, one with missing fields, one with an
/// unclosed annotation
pub const PRIMARY_RAW_CORPUS: &str = "\
海鸥\t\t(歌曲)\t\thttps://baike.baidu.com/item/海鸥/2\t\tsummary::;《海鸥》是网剧《[[/item/%E5%8D%97%E5%8C%97%E5%85%84%E5%BC%9F|南北兄弟]]》插曲， 由[[/item/顾峰|顾峰]]作词
缺少字段\t\thttps://baike.baidu.com/item/x
顾峰\t\t(作词人)\t\thttps://baike.baidu.com/item/顾峰/123\t\tsummary::;[[未闭合
";

/// Expected refined output for [`PRIMARY_RAW_CORPUS`]
pub const PRIMARY_REFINED: &str = "bdi1\t\t《海鸥》是网剧《[[/item/%E5%8D%97%E5%8C%97%E5%85%84%E5%BC%9F|南北兄弟]]》插曲，由[[/item/顾峰|顾峰]]作词";

/// Expected annotation-refined output for [`PRIMARY_REFINED`]
pub const PRIMARY_ANNOTATED: &str = "bdi1\t\t《海鸥》是网剧《[[bdi2|南北兄弟]]》插曲，由[[bdi3|顾峰]]作词";

/// Wiki dictionary: `title \t\t uris \t\t wikidataId \t\t entityId`
pub const WIKI_DICTIONARY: &str = "\
rust (programming language)\t\t/wiki/rust_(programming_language)\t\tQ575650\t\twk1
mercury (planet)\t\t/wiki/mercury_(planet)\t\tQ308\t\twk2
mercury (element)\t\t/wiki/mercury_(element)\t\tQ925\t\twk3
mozilla\t\t/wiki/mozilla\t\tQ166\t\twk4
";

/// Wiki raw corpus: `title \t\t url \t\t marker::;body`
pub const WIKI_RAW_CORPUS: &str = "\
Rust (programming language)\t\thttps://en.wikipedia.org/wiki/Rust_(programming_language)\t\tabstract::;Rust began at [[Mozilla|Mozilla Research]], not on [[mercury]].
Unknown page\t\thttps://en.wikipedia.org/wiki/Unknown\t\tabstract::;text
Mozilla\t\thttps://en.wikipedia.org/wiki/Mozilla\t\tabstract::;Maintainer of [[Rust]] and [[rust (programming language)|Rust]].
";

/// Annotation-refined corpus shards for anchor extraction
pub const ANNOTATED_SHARD_A: &str = "\
wk1\t\tRust began at [[wk4|Mozilla]] and [[wk4|mozilla]] hosts it.
wk4\t\tMaintainer of [[wk1|Rust]].
";

pub const ANNOTATED_SHARD_B: &str = "\
wk2\t\tThe planet [[wk2|Mercury]] and the element [[wk3|mercury]].
broken line
wk3\t\tSee [[wk2|Mercury]] and [[wk9|X]].
";
