//! Named example snippets.
//!
//! ## Learning: Borrowing From a Long-Lived Owner
//!
//! The store owns every snippet for the whole process. `get` hands out
//! `&str` borrowed from it, so looking a snippet up never copies the text.

use std::collections::HashMap;

use crate::{CoreResult, ViewError};

/// A named, immutable block of example source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub name: String,
    pub text: String,
}

/// Immutable mapping from tab identifier to snippet text.
///
/// Insertion order is kept and doubles as tab order.
#[derive(Debug, Clone, Default)]
pub struct SnippetStore {
    snippets: Vec<Snippet>,
    index: HashMap<String, usize>,
}

impl SnippetStore {
    /// Builds a store from `(name, text)` pairs. A repeated name replaces the
    /// earlier text but keeps its position.
    pub fn from_entries<N, T>(entries: impl IntoIterator<Item = (N, T)>) -> Self
    where
        N: Into<String>,
        T: Into<String>,
    {
        let mut store = Self::default();
        for (name, text) in entries {
            let name = name.into();
            let text = text.into();
            match store.index.get(&name) {
                Some(&i) => store.snippets[i].text = text,
                None => {
                    store.index.insert(name.clone(), store.snippets.len());
                    store.snippets.push(Snippet { name, text });
                }
            }
        }
        store
    }

    /// The examples shipped with the documentation page.
    pub fn builtin() -> Self {
        Self::from_entries(BUILTIN.iter().copied())
    }

    /// Returns the text for `name`.
    pub fn get(&self, name: &str) -> CoreResult<&str> {
        self.index
            .get(name)
            .map(|&i| self.snippets[i].text.as_str())
            .ok_or_else(|| ViewError::SnippetNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Snippet names in tab order.
    pub fn names(&self) -> Vec<String> {
        self.snippets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snippet> {
        self.snippets.iter()
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    /// Checks that every tab has a snippet behind it.
    pub fn check_tabs<S: AsRef<str>>(&self, tabs: &[S]) -> CoreResult<()> {
        match tabs.iter().find(|tab| !self.contains(tab.as_ref())) {
            Some(missing) => Err(ViewError::SnippetNotFound(missing.as_ref().to_string())),
            None => Ok(()),
        }
    }
}

const BUILTIN: &[(&str, &str)] = &[
    ("client", CLIENT),
    ("insert", INSERT),
    ("select", SELECT),
    ("marshal", MARSHAL),
];

const CLIENT: &str = r##"package main

import (
    "context"

    "github.com/aws/aws-sdk-go-v2/config"
    "github.com/aws/aws-sdk-go-v2/service/dynamodb"
    "github.com/aws/aws-sdk-go-v2/service/dynamodb/types"
    gdrm "github.com/zkfmapf123/gdrm"
)

func main() {
    ctx := context.Background()

    // Load AWS configuration
    cfg, _ := config.LoadDefaultConfig(ctx)
    dynamoClient := dynamodb.NewFromConfig(cfg)

    // Create the GDRM client
    client := gdrm.NewDDB(dynamoClient)

    // Register table settings
    client.AddTable("my_table", gdrm.DDBTableParams{
        IsCreate:        true,
        IsPK:            true,
        PkAttributeType: types.ScalarAttributeTypeS,
        IsSK:            true,
        SkAttributeType: types.ScalarAttributeTypeS,
        BillingMode: gdrm.DDBBillingMode{
            IsOnDemand: true,
        },
    })

    // Create the tables
    client.Start(ctx, true)
}"##;

const INSERT: &str = r##"type User struct {
    PK   string `dynamodbav:"PK"`
    SK   string `dynamodbav:"SK"`
    Name string `dynamodbav:"Name"`
    Age  int    `dynamodbav:"Age"`
}

ctx := context.Background()

// Single insert
err := client.Insert(ctx, "my_table", User{
    PK:   "USER#123",
    SK:   "#PROFILE",
    Name: "tom",
    Age:  32,
})

// Batch insert (split into chunks of 25 automatically)
users := []any{
    User{PK: "USER#1", SK: "#PROFILE", Name: "tom", Age: 32},
    User{PK: "USER#2", SK: "#PROFILE", Name: "jane", Age: 28},
    User{PK: "USER#3", SK: "#PROFILE", Name: "mike", Age: 30},
}

err = client.InsertBatch(ctx, "my_table", users)"##;

const SELECT: &str = r##"ctx := context.Background()

// Single lookup
item, err := client.FindByKey(ctx, "my_table", "USER#123", "#PROFILE")
if err != nil {
    log.Fatal(err)
}

// Query with an expression
items, err := client.FindByKeyUseExpression(
    ctx,
    "my_table",
    100,  // limit
    gdrm.RangeParams{
        KeyConditionExpression: "PK = :pk",
        ExpressionAttributeValues: map[string]types.AttributeValue{
            ":pk": &types.AttributeValueMemberS{Value: "TEAM#DEV"},
        },
    },
)

// Using begins_with
items, err = client.FindByKeyUseExpression(
    ctx,
    "my_table",
    50,
    gdrm.RangeParams{
        KeyConditionExpression: "PK = :pk AND begins_with(SK, :sk)",
        ExpressionAttributeValues: map[string]types.AttributeValue{
            ":pk": &types.AttributeValueMemberS{Value: "USER#123"},
            ":sk": &types.AttributeValueMemberS{Value: "ORDER#"},
        },
    },
)"##;

const MARSHAL: &str = r##"ctx := context.Background()

// Convert a single result
item, _ := client.FindByKey(ctx, "my_table", "USER#123", "#PROFILE")

// Typed conversion with generics
user := gdrm.MarshalMap[User](item)

fmt.Println(user.Name)  // "tom"
fmt.Println(user.Age)   // 32

// Convert multiple results
items, _ := client.FindByKeyUseExpression(...)

users := gdrm.MarshalMaps[User](items)

for _, u := range users {
    fmt.Printf("%s: %d years old\n", u.Name, u.Age)
}"##;
