/*
 * Responsibility
 * - Router 単位で掛ける middleware 群
 * - 各モジュールは apply(router, config) を公開する
 */
pub mod cors;
pub mod http;
