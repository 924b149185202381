/*
 * Responsibility
 * - ストア接続 / クライアント (cache)
 * - 訪問者レコードのモデルと、ストア上の表現 (codec)
 */
pub mod cache;
pub mod visit;
pub mod visit_codec;
