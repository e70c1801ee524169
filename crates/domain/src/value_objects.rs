//! # 値オブジェクト
//!
//! 複数のモジュールから使用される汎用の値オブジェクトを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 用途 |
//! |---|------------|------|
//! | [`FullName`] | 表示名 | ユーザープロフィールの表示名 |

// =========================================================================
// FullName（ユーザー表示名）
// =========================================================================

define_validated_string! {
    /// ユーザー表示名（値オブジェクト）
    ///
    /// プロフィールに表示されるフルネームを表現する。
    /// PII（個人識別情報）のため、Debug 出力はマスクされる。
    ///
    /// # バリデーション
    ///
    /// - 空文字列ではない
    /// - 最大 140 文字
    pub struct FullName {
        label: "Full name",
        max_length: 140,
        pii: true,
    }
}
