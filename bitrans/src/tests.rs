//! bitransのテストモジュール群
//!
//! ルール定義のコンパイルから行の出力までを通して動作を検証するテストを含みます。

mod properties;
